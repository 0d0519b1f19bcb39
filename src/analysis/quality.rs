//! Data quality checks: duplicate rows and column types.

use std::collections::HashSet;

use crate::data::filter::FilteredView;
use crate::data::model::{ColumnKind, Dataset};

/// Number of rows identical to an earlier row of the view.
pub fn duplicate_rows(view: &FilteredView<'_>) -> usize {
    let mut seen = HashSet::with_capacity(view.len());
    view.rows().filter(|row| !seen.insert(&row.cells)).count()
}

pub fn column_types(dataset: &Dataset) -> Vec<(String, ColumnKind)> {
    dataset
        .column_names
        .iter()
        .cloned()
        .zip(dataset.kinds.iter().copied())
        .collect()
}
