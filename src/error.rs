//! Recoverable analysis conditions.
//!
//! Loading and export failures are plain `anyhow` errors with context; the
//! conditions below are expected on some filter selections and the UI shows
//! them as messages instead of the skipped chart.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The view has no integer or float columns.
    #[error("No numeric data available for {0}.")]
    NoNumericColumns(&'static str),

    /// Scatter plots need two numeric columns.
    #[error("Not enough numeric columns available for scatter plots (found {found}).")]
    NotEnoughNumericColumns { found: usize },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),
}
