//! Data and analysis layer of the World Marriage explorer.
//!
//! The egui front-end in `main.rs` only renders what these modules compute:
//! load a table once, filter it by categorical selections, derive summary
//! tables from the filtered view and export it back to CSV.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;

pub use analysis::{ExplorationReport, Overview};
pub use config::Config;
pub use data::filter::{FilterCriteria, FilteredView, RowSet, YearRange};
pub use data::model::{CellValue, ColumnKind, Dataset, Row};
pub use error::AnalysisError;
