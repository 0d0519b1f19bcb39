use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use anyhow::{bail, Result};

use crate::error::AnalysisError;

/// Column holding the country name.
pub const COUNTRY: &str = "Country";
/// Column holding the age bracket, e.g. `20-24`.
pub const AGE_GROUP: &str = "AgeGroup";
/// Column holding the sex of the population group.
pub const SEX: &str = "Sex";
/// Column holding the marital status category.
pub const MARITAL_STATUS: &str = "MaritalStatus";
/// First year of the data-collection window.
pub const START_YEAR: &str = "Data Collection (Start Year)";
/// Last year of the data-collection window.
pub const END_YEAR: &str = "Data Collection (End Year)";

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a CSV reader infers.
/// Values are kept in `BTreeSet`s downstream so `CellValue` must be `Ord`.
///
/// Equality, ordering and hashing all go through [`float_key`], so `-0.0`
/// and `0.0` are one value and every float equals itself.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord/Hash so we can put CellValue in BTreeSet and HashSet --

/// Bit pattern floats are compared and hashed by; negative zero folds into
/// positive zero.
fn float_key(v: f64) -> u64 {
    if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

fn float_cmp(a: f64, b: f64) -> std::cmp::Ordering {
    f64::from_bits(float_key(a)).total_cmp(&f64::from_bits(float_key(b)))
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) | Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => float_cmp(*a, *b),
            // Mixed numeric columns sort by magnitude; ties keep ints first.
            (Integer(a), Float(b)) => float_cmp(*a as f64, *b).then(Ordering::Less),
            (Float(a), Integer(b)) => float_cmp(*a, *b as f64).then(Ordering::Greater),
            (String(a), String(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => float_key(*f).hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

/// CSV text form: nulls are empty, floats keep full precision.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:?}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the value, used by every statistic.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Human-readable label for widgets and legends.
    pub fn label(&self) -> String {
        match self {
            CellValue::Null => "<null>".to_string(),
            CellValue::Float(v) => format!("{v:.4}"),
            other => other.to_string(),
        }
    }

    fn kind(&self) -> ColumnKind {
        match self {
            CellValue::String(_) => ColumnKind::Text,
            CellValue::Integer(_) => ColumnKind::Integer,
            CellValue::Float(_) => ColumnKind::Float,
            CellValue::Bool(_) => ColumnKind::Boolean,
            CellValue::Null => ColumnKind::Empty,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – inferred dtype of a whole column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    Float,
    Boolean,
    Text,
    /// Every cell is null.
    Empty,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }

    /// Widen `self` so it can also hold a value of kind `other`.
    fn merge(self, other: ColumnKind) -> ColumnKind {
        use ColumnKind::*;
        match (self, other) {
            (a, Empty) => a,
            (Empty, b) => b,
            (a, b) if a == b => a,
            (Integer, Float) | (Float, Integer) => Float,
            _ => Text,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Boolean => "bool",
            ColumnKind::Text => "object",
            ColumnKind::Empty => "empty",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Row / Dataset
// ---------------------------------------------------------------------------

/// One record of the table; cells are in `Dataset::column_names` order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub cells: Vec<CellValue>,
}

/// The full parsed table with pre-computed column indices.
///
/// Never mutated after construction; filters and statistics borrow it.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// All records.
    pub rows: Vec<Row>,
    /// Inferred dtype per column, parallel to `column_names`.
    pub kinds: Vec<ColumnKind>,
    /// For each column the sorted set of distinct non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
}

impl Dataset {
    /// Build column indices from the loaded rows.
    pub fn new(column_names: Vec<String>, rows: Vec<Row>) -> Result<Self> {
        let width = column_names.len();
        let mut kinds = vec![ColumnKind::Empty; width];
        let mut uniques: Vec<BTreeSet<CellValue>> = vec![BTreeSet::new(); width];

        for (row_no, row) in rows.iter().enumerate() {
            if row.cells.len() != width {
                bail!(
                    "Row {row_no}: expected {width} cells but found {}",
                    row.cells.len()
                );
            }
            for (idx, cell) in row.cells.iter().enumerate() {
                if cell.is_null() {
                    continue;
                }
                kinds[idx] = kinds[idx].merge(cell.kind());
                uniques[idx].insert(cell.clone());
            }
        }

        let unique_values = column_names.iter().cloned().zip(uniques).collect();
        Ok(Dataset {
            column_names,
            rows,
            kinds,
            unique_values,
        })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.column_names.iter().position(|c| c == name)
    }

    /// Like [`Dataset::column_index`] but fails with a typed error.
    pub fn require_column(&self, name: &str) -> Result<usize, AnalysisError> {
        self.column_index(name)
            .ok_or_else(|| AnalysisError::ColumnNotFound(name.to_string()))
    }

    /// Indices and names of the numeric columns, in file order.
    pub fn numeric_columns(&self) -> Vec<(usize, &str)> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.is_numeric())
            .map(|(i, _)| (i, self.column_names[i].as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    #[test]
    fn infers_kinds_per_column() {
        let ds = Dataset::new(
            vec!["name".into(), "n".into(), "x".into(), "blank".into()],
            vec![
                Row { cells: vec![s("a"), CellValue::Integer(1), CellValue::Integer(2), CellValue::Null] },
                Row { cells: vec![s("b"), CellValue::Null, CellValue::Float(2.5), CellValue::Null] },
            ],
        )
        .unwrap();

        assert_eq!(
            ds.kinds,
            vec![ColumnKind::Text, ColumnKind::Integer, ColumnKind::Float, ColumnKind::Empty]
        );
        let numeric: Vec<&str> = ds.numeric_columns().into_iter().map(|(_, n)| n).collect();
        assert_eq!(numeric, vec!["n", "x"]);
        assert_eq!(ds.unique_values["n"].len(), 1);
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = Dataset::new(
            vec!["a".into(), "b".into()],
            vec![Row { cells: vec![CellValue::Integer(1)] }],
        )
        .unwrap_err();
        assert!(err.to_string().contains("expected 2 cells"));
    }

    #[test]
    fn mixed_numbers_order_by_magnitude() {
        let mut set = BTreeSet::new();
        set.insert(CellValue::Float(2.5));
        set.insert(CellValue::Integer(3));
        set.insert(CellValue::Integer(1));
        let ordered: Vec<String> = set.iter().map(|v| v.to_string()).collect();
        assert_eq!(ordered, vec!["1", "2.5", "3"]);
    }

    #[test]
    fn signed_zeros_are_one_value() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |v: &CellValue| {
            let mut h = DefaultHasher::new();
            v.hash(&mut h);
            h.finish()
        };
        let (pos, neg) = (CellValue::Float(0.0), CellValue::Float(-0.0));
        assert_eq!(pos, neg);
        assert_eq!(pos.cmp(&neg), std::cmp::Ordering::Equal);
        assert_eq!(hash(&pos), hash(&neg));

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_ne!(CellValue::Integer(1), CellValue::Float(1.0));
    }

    #[test]
    fn null_displays_empty_but_labels_visibly() {
        assert_eq!(CellValue::Null.to_string(), "");
        assert_eq!(CellValue::Null.label(), "<null>");
        assert_eq!(CellValue::Float(1.0).to_string(), "1.0");
    }

    #[test]
    fn missing_column_is_typed_error() {
        let ds = Dataset::new(vec!["a".into()], Vec::new()).unwrap();
        assert!(matches!(
            ds.require_column("Country"),
            Err(AnalysisError::ColumnNotFound(c)) if c == "Country"
        ));
    }
}
