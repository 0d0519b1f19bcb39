//! Missing-value analysis.

use crate::data::filter::FilteredView;

/// Null count for every column, in dataset column order.
pub fn null_counts(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    view.dataset
        .column_names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let n = view.column_values(col).filter(|v| v.is_null()).count();
            (name.clone(), n)
        })
        .collect()
}

/// Only the columns that actually have missing values.
pub fn columns_with_missing(view: &FilteredView<'_>) -> Vec<(String, usize)> {
    null_counts(view).into_iter().filter(|(_, n)| *n > 0).collect()
}

/// `mask[row][col]` is true where the cell is null; rows in view order.
pub fn missing_mask(view: &FilteredView<'_>) -> Vec<Vec<bool>> {
    view.rows()
        .map(|row| row.cells.iter().map(|c| c.is_null()).collect())
        .collect()
}
