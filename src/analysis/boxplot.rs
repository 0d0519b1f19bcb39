//! Tukey boxplot statistics for outlier inspection.

use super::describe::quantile;
use crate::data::filter::FilteredView;
use crate::error::AnalysisError;

/// Fence multiplier on the inter-quartile range.
const WHISKER_IQR: f64 = 1.5;

#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub column: String,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value at or above `q1 - 1.5 * IQR`.
    pub lower_whisker: f64,
    /// Largest value at or below `q3 + 1.5 * IQR`.
    pub upper_whisker: f64,
    /// Values beyond the fences, ascending.
    pub outliers: Vec<f64>,
}

impl BoxStats {
    pub fn from_values(column: &str, mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        values.sort_by(f64::total_cmp);
        let q1 = quantile(&values, 0.25);
        let median = quantile(&values, 0.5);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - WHISKER_IQR * iqr, q3 + WHISKER_IQR * iqr);

        let inside: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| *v >= low_fence && *v <= high_fence)
            .collect();
        let lower_whisker = inside.first().copied().unwrap_or(q1);
        let upper_whisker = inside.last().copied().unwrap_or(q3);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        Some(BoxStats {
            column: column.to_string(),
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        })
    }
}

/// One box per numeric column; all-null columns are skipped.
pub fn boxplot_stats(view: &FilteredView<'_>) -> Result<Vec<BoxStats>, AnalysisError> {
    let numeric = view.dataset.numeric_columns();
    if numeric.is_empty() || view.is_empty() {
        return Err(AnalysisError::NoNumericColumns("outlier analysis"));
    }
    Ok(numeric
        .into_iter()
        .filter_map(|(col, name)| BoxStats::from_values(name, view.numeric_values(col)))
        .collect())
}
