//! Descriptive statistics over a [`FilteredView`].
//!
//! Every function here is a pure function of the view. [`ExplorationReport`]
//! runs all of them for one filter selection so the UI only redraws.

pub mod boxplot;
pub mod correlation;
pub mod counts;
pub mod describe;
pub mod missing;
pub mod quality;
pub mod scatter;

use log::debug;

use crate::data::filter::FilteredView;
use crate::data::model::{CellValue, ColumnKind, AGE_GROUP, MARITAL_STATUS, SEX};
use crate::error::AnalysisError;

use boxplot::BoxStats;
use correlation::CorrelationMatrix;
use counts::{GroupedCounts, Proportion};
use describe::{ColumnInfo, ColumnSummary};

/// Everything the exploration page shows for one filtered view.
///
/// The recoverable conditions ([`AnalysisError::NoNumericColumns`],
/// [`AnalysisError::NotEnoughNumericColumns`]) are kept as `Err` so the page
/// can print them in place of the skipped chart.
#[derive(Debug, Clone)]
pub struct ExplorationReport {
    pub row_count: usize,
    pub status_by_sex: Result<GroupedCounts, AnalysisError>,
    pub status_by_age: Result<GroupedCounts, AnalysisError>,
    pub status_share: Result<Vec<Proportion>, AnalysisError>,
    pub correlation: Result<CorrelationMatrix, AnalysisError>,
    pub scatter_axes: Result<Vec<String>, AnalysisError>,
    pub null_counts: Vec<(String, usize)>,
    pub missing_mask: Vec<Vec<bool>>,
    pub columns_with_missing: Vec<(String, usize)>,
    pub duplicate_rows: usize,
    pub column_types: Vec<(String, ColumnKind)>,
    pub boxplots: Result<Vec<BoxStats>, AnalysisError>,
    pub summary: Result<Vec<ColumnSummary>, AnalysisError>,
}

impl ExplorationReport {
    pub fn build(view: &FilteredView<'_>) -> Self {
        debug!("Building exploration report for {} rows", view.len());
        ExplorationReport {
            row_count: view.len(),
            status_by_sex: counts::grouped_counts(view, MARITAL_STATUS, SEX),
            status_by_age: counts::grouped_counts(view, AGE_GROUP, MARITAL_STATUS),
            status_share: counts::proportions(view, MARITAL_STATUS),
            correlation: correlation::correlation_matrix(view),
            scatter_axes: scatter::scatter_axes(view),
            null_counts: missing::null_counts(view),
            missing_mask: missing::missing_mask(view),
            columns_with_missing: missing::columns_with_missing(view),
            duplicate_rows: quality::duplicate_rows(view),
            column_types: quality::column_types(view.dataset),
            boxplots: boxplot::boxplot_stats(view),
            summary: describe::describe(view),
        }
    }
}

/// The dataset-wide overview shown above the filters.
#[derive(Debug, Clone)]
pub struct Overview {
    pub summary: Result<Vec<ColumnSummary>, AnalysisError>,
    pub column_info: Vec<ColumnInfo>,
    pub status_counts: Result<Vec<(CellValue, usize)>, AnalysisError>,
}

impl Overview {
    pub fn build(view: &FilteredView<'_>) -> Self {
        Overview {
            summary: describe::describe(view),
            column_info: describe::column_info(view),
            status_counts: counts::value_counts(view, MARITAL_STATUS),
        }
    }
}
