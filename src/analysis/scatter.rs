//! Point clouds for the scatter plot.

use crate::data::filter::FilteredView;
use crate::error::AnalysisError;

/// Numeric columns selectable as scatter axes; fewer than two means no plot.
pub fn scatter_axes(view: &FilteredView<'_>) -> Result<Vec<String>, AnalysisError> {
    let numeric = view.dataset.numeric_columns();
    if numeric.len() < 2 {
        return Err(AnalysisError::NotEnoughNumericColumns {
            found: numeric.len(),
        });
    }
    Ok(numeric.into_iter().map(|(_, name)| name.to_string()).collect())
}

/// `[x, y]` points from rows where both values are present.
pub fn scatter_points(
    view: &FilteredView<'_>,
    x_column: &str,
    y_column: &str,
) -> Result<Vec<[f64; 2]>, AnalysisError> {
    let x = view.dataset.require_column(x_column)?;
    let y = view.dataset.require_column(y_column)?;
    Ok(view
        .rows()
        .filter_map(|row| Some([row.cells[x].as_f64()?, row.cells[y].as_f64()?]))
        .collect())
}
