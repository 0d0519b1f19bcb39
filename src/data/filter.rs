use std::collections::BTreeSet;

use log::debug;

use super::model::{CellValue, Dataset, Row, AGE_GROUP, COUNTRY, END_YEAR, SEX, START_YEAR};
use crate::error::AnalysisError;

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// A single multiselect: the column and the values picked for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub column: String,
    pub values: BTreeSet<CellValue>,
}

/// Ordered per-column selections.
///
/// An empty selection means "no filter on this column". Order matters for
/// [`FilterCriteria::options_for`]: each column only offers values that
/// survive the selections before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriteria {
    pub selections: Vec<Selection>,
}

impl Default for FilterCriteria {
    /// Country, then age group, then sex.
    fn default() -> Self {
        Self::for_columns(&[COUNTRY, AGE_GROUP, SEX])
    }
}

impl FilterCriteria {
    pub fn for_columns(columns: &[&str]) -> Self {
        FilterCriteria {
            selections: columns
                .iter()
                .map(|c| Selection {
                    column: c.to_string(),
                    values: BTreeSet::new(),
                })
                .collect(),
        }
    }

    /// Whether every selection is empty.
    pub fn is_unfiltered(&self) -> bool {
        self.selections.iter().all(|s| s.values.is_empty())
    }

    pub fn selected(&self, column: &str) -> Option<&BTreeSet<CellValue>> {
        self.selections
            .iter()
            .find(|s| s.column == column)
            .map(|s| &s.values)
    }

    /// Replace the selection for `column`; unknown columns are appended.
    pub fn set(&mut self, column: &str, values: BTreeSet<CellValue>) {
        match self.selections.iter_mut().find(|s| s.column == column) {
            Some(sel) => sel.values = values,
            None => self.selections.push(Selection {
                column: column.to_string(),
                values,
            }),
        }
    }

    /// Toggle a single value in a column's selection.
    pub fn toggle(&mut self, column: &str, value: &CellValue) {
        let mut values = self.selected(column).cloned().unwrap_or_default();
        if !values.remove(value) {
            values.insert(value.clone());
        }
        self.set(column, values);
    }

    pub fn clear(&mut self, column: &str) {
        self.set(column, BTreeSet::new());
    }

    /// Values offered for `column`: its distinct values among rows passing
    /// every selection that precedes it.
    pub fn options_for(
        &self,
        dataset: &Dataset,
        column: &str,
    ) -> Result<BTreeSet<CellValue>, AnalysisError> {
        let col_idx = dataset.require_column(column)?;
        let position = self
            .selections
            .iter()
            .position(|s| s.column == column)
            .unwrap_or(self.selections.len());
        let upstream = FilterCriteria {
            selections: self.selections[..position].to_vec(),
        };
        let rows = apply(dataset, &upstream)?;
        Ok(rows
            .view(dataset)
            .rows()
            .map(|row| &row.cells[col_idx])
            .filter(|v| !v.is_null())
            .cloned()
            .collect())
    }

    /// Drop selected values that are no longer offered after an upstream
    /// selection changed.
    pub fn prune(&mut self, dataset: &Dataset) -> Result<(), AnalysisError> {
        for i in 0..self.selections.len() {
            if self.selections[i].values.is_empty() {
                continue;
            }
            let column = self.selections[i].column.clone();
            let offered = self.options_for(dataset, &column)?;
            let before = self.selections[i].values.len();
            self.selections[i].values.retain(|v| offered.contains(v));
            if self.selections[i].values.len() != before {
                debug!("Pruned stale selections from '{column}'");
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FilteredView – row subset of the dataset
// ---------------------------------------------------------------------------

/// Read-only projection of a [`Dataset`]: the ascending indices of the rows
/// that passed a filter.
#[derive(Debug, Clone, Copy)]
pub struct FilteredView<'a> {
    pub dataset: &'a Dataset,
    pub indices: &'a [usize],
}

/// Owned row indices; borrow as a [`FilteredView`] with [`RowSet::view`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub indices: Vec<usize>,
}

impl RowSet {
    pub fn all(dataset: &Dataset) -> Self {
        RowSet {
            indices: (0..dataset.len()).collect(),
        }
    }

    pub fn view<'a>(&'a self, dataset: &'a Dataset) -> FilteredView<'a> {
        FilteredView {
            dataset,
            indices: &self.indices,
        }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> + 'a {
        let (dataset, indices) = (self.dataset, self.indices);
        indices.iter().map(move |&i| &dataset.rows[i])
    }

    /// Cells of one column, in view order.
    pub fn column_values(&self, col: usize) -> impl Iterator<Item = &'a CellValue> + 'a {
        self.rows().map(move |row| &row.cells[col])
    }

    /// Numeric values of one column, nulls skipped.
    pub fn numeric_values(&self, col: usize) -> Vec<f64> {
        self.column_values(col).filter_map(CellValue::as_f64).collect()
    }
}

/// Return the rows that pass every non-empty selection.
///
/// A row passes a selection when its value for that column is in the set.
/// Empty selections impose no constraint.
pub fn apply(dataset: &Dataset, criteria: &FilterCriteria) -> Result<RowSet, AnalysisError> {
    let active: Vec<(usize, &BTreeSet<CellValue>)> = criteria
        .selections
        .iter()
        .filter(|s| !s.values.is_empty())
        .map(|s| -> Result<_, AnalysisError> {
            Ok((dataset.require_column(&s.column)?, &s.values))
        })
        .collect::<Result<_, _>>()?;

    Ok(select(dataset, |row| {
        active
            .iter()
            .all(|(col, selected)| selected.contains(&row.cells[*col]))
    }))
}

/// Rows whose `column` equals `value`.
pub fn filter_equals(
    dataset: &Dataset,
    column: &str,
    value: &CellValue,
) -> Result<RowSet, AnalysisError> {
    let col = dataset.require_column(column)?;
    Ok(select(dataset, |row| &row.cells[col] == value))
}

fn select(dataset: &Dataset, keep: impl Fn(&Row) -> bool) -> RowSet {
    RowSet {
        indices: dataset
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(row))
            .map(|(i, _)| i)
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Data-collection year window
// ---------------------------------------------------------------------------

/// Inclusive window on the data-collection period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearRange {
    pub start: i64,
    pub end: i64,
}

impl YearRange {
    /// Earliest start year and latest end year in the dataset, or `None` if
    /// either column has no numeric values.
    pub fn bounds(dataset: &Dataset) -> Result<Option<YearRange>, AnalysisError> {
        let start_col = dataset.require_column(START_YEAR)?;
        let end_col = dataset.require_column(END_YEAR)?;
        let years = |col: usize| {
            dataset
                .rows
                .iter()
                .filter_map(move |r| r.cells[col].as_f64())
                .map(|y| y as i64)
        };
        Ok(match (years(start_col).min(), years(end_col).max()) {
            (Some(start), Some(end)) => Some(YearRange { start, end }),
            _ => None,
        })
    }

    /// Rows collected entirely inside the window: start year `>= start` and
    /// end year `<= end`. Rows with a missing year never match.
    pub fn apply(&self, dataset: &Dataset) -> Result<RowSet, AnalysisError> {
        let start_col = dataset.require_column(START_YEAR)?;
        let end_col = dataset.require_column(END_YEAR)?;
        let (lo, hi) = (self.start as f64, self.end as f64);
        Ok(select(dataset, |row| {
            matches!(
                (row.cells[start_col].as_f64(), row.cells[end_col].as_f64()),
                (Some(s), Some(e)) if s >= lo && e <= hi
            )
        }))
    }
}
