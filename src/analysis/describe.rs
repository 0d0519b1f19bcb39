//! Summary statistics per numeric column, plus the column overview.

use crate::data::filter::FilteredView;
use crate::data::model::ColumnKind;
use crate::error::AnalysisError;

/// count / mean / std / min / quartiles / max of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1); `NaN` below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    /// Statistics as `(label, value)` rows for display.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

pub fn describe(view: &FilteredView<'_>) -> Result<Vec<ColumnSummary>, AnalysisError> {
    let numeric = view.dataset.numeric_columns();
    if numeric.is_empty() {
        return Err(AnalysisError::NoNumericColumns("summary statistics"));
    }
    Ok(numeric
        .into_iter()
        .map(|(col, name)| summarize(name, view.numeric_values(col)))
        .collect())
}

fn summarize(name: &str, mut values: Vec<f64>) -> ColumnSummary {
    values.sort_by(f64::total_cmp);
    let count = values.len();
    let mean = if count == 0 {
        f64::NAN
    } else {
        values.iter().sum::<f64>() / count as f64
    };
    let std = if count < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    };
    ColumnSummary {
        column: name.to_string(),
        count,
        mean,
        std,
        min: values.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&values, 0.25),
        median: quantile(&values, 0.5),
        q75: quantile(&values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear-interpolated quantile of already sorted values.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
        }
    }
}

/// One line of the column overview: name, non-null count and dtype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub column: String,
    pub non_null: usize,
    pub kind: ColumnKind,
}

pub fn column_info(view: &FilteredView<'_>) -> Vec<ColumnInfo> {
    view.dataset
        .column_names
        .iter()
        .enumerate()
        .map(|(col, name)| ColumnInfo {
            column: name.clone(),
            non_null: view.column_values(col).filter(|v| !v.is_null()).count(),
            kind: view.dataset.kinds[col],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::RowSet;
    use crate::data::loader::load_csv_reader;

    #[test]
    fn quantiles_interpolate_linearly() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile(&v, 0.25), 1.75);
        assert_eq!(quantile(&v, 0.5), 2.5);
        assert_eq!(quantile(&v, 0.75), 3.25);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn describe_skips_nulls_and_text() {
        let text = "Country,Share\nA,1\nB,2\nC,\nD,3\nE,4\nF,5\n";
        let ds = load_csv_reader(text.as_bytes()).unwrap();
        let summary = describe(&RowSet::all(&ds).view(&ds)).unwrap();

        assert_eq!(summary.len(), 1);
        let s = &summary[0];
        assert_eq!(s.column, "Share");
        assert_eq!(s.count, 5);
        assert_eq!(s.mean, 3.0);
        assert!((s.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!((s.min, s.median, s.max), (1.0, 3.0, 5.0));
        assert_eq!((s.q25, s.q75), (2.0, 4.0));
    }

    #[test]
    fn single_value_has_undefined_std() {
        let ds = load_csv_reader("Share\n7\n".as_bytes()).unwrap();
        let summary = describe(&RowSet::all(&ds).view(&ds)).unwrap();
        assert!(summary[0].std.is_nan());
        assert_eq!(summary[0].median, 7.0);
    }

    #[test]
    fn column_info_counts_non_null() {
        let ds = load_csv_reader("Country,Share\nA,1\n,2\nC,\n".as_bytes()).unwrap();
        let info = column_info(&RowSet::all(&ds).view(&ds));
        assert_eq!(info[0].non_null, 2);
        assert_eq!(info[1].non_null, 2);
        assert_eq!(info[1].kind, ColumnKind::Integer);
    }
}
