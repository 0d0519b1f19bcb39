use std::path::Path;

use anyhow::Result;
use log::{error, info};

use marriage_explorer::data::filter::{self, FilterCriteria, RowSet, YearRange};
use marriage_explorer::data::model::{CellValue, Dataset, AGE_GROUP, COUNTRY};
use marriage_explorer::data::{export, loader};
use marriage_explorer::{Config, ExplorationReport, Overview};

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Exploration,
    Visualizations,
    Insights,
    Download,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::Home,
        Page::Exploration,
        Page::Visualizations,
        Page::Insights,
        Page::Download,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Page::Home => "🏠 Home",
            Page::Exploration => "🔍 Data Exploration",
            Page::Visualizations => "📈 Visualizations",
            Page::Insights => "💡 Insights",
            Page::Download => "📥 Download",
        }
    }
}

/// Single-value pickers of the Visualizations page.
#[derive(Debug, Clone, Default)]
pub struct VizSelection {
    pub country: Option<CellValue>,
    pub age_group: Option<CellValue>,
    pub years: Option<YearRange>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: Config,

    /// Loaded dataset (None until a file loads).
    pub dataset: Option<Dataset>,

    /// Statistics of the whole dataset, computed once per load.
    pub overview: Option<Overview>,

    pub page: Page,

    /// Country / age group / sex multiselects.
    pub filters: FilterCriteria,

    /// Rows passing the current filters (cached).
    pub visible: RowSet,

    /// Derived tables for `visible`, rebuilt on every filter change.
    pub report: Option<ExplorationReport>,

    pub scatter_x: Option<String>,
    pub scatter_y: Option<String>,

    pub viz: VizSelection,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            dataset: None,
            overview: None,
            page: Page::Home,
            filters: FilterCriteria::default(),
            visible: RowSet::default(),
            report: None,
            scatter_x: None,
            scatter_y: None,
            viz: VizSelection::default(),
            status_message: None,
        }
    }

    /// Load the configured dataset, keeping the error for display.
    pub fn load_configured(&mut self) {
        let path = self.config.dataset_path.clone();
        self.load_path(&path);
    }

    pub fn load_path(&mut self, path: &Path) {
        match loader::load_file(path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and reset every selection.
    pub fn set_dataset(&mut self, dataset: Dataset) {
        self.filters = FilterCriteria::default();
        self.visible = RowSet::all(&dataset);
        self.overview = Some(Overview::build(&self.visible.view(&dataset)));
        self.report = Some(ExplorationReport::build(&self.visible.view(&dataset)));

        let axes = self.report.as_ref().and_then(|r| r.scatter_axes.as_ref().ok());
        self.scatter_x = axes.and_then(|a| a.first().cloned());
        self.scatter_y = axes.and_then(|a| a.get(1).cloned());

        self.viz = VizSelection {
            country: first_value(&dataset, COUNTRY),
            age_group: first_value(&dataset, AGE_GROUP),
            years: YearRange::bounds(&dataset).ok().flatten(),
        };

        self.dataset = Some(dataset);
        self.status_message = None;
    }

    /// Recompute `visible` and the report after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let result = self
            .filters
            .prune(ds)
            .and_then(|()| filter::apply(ds, &self.filters));
        match result {
            Ok(rows) => {
                info!("Filter selects {} of {} rows", rows.len(), ds.len());
                self.report = Some(ExplorationReport::build(&rows.view(ds)));
                self.visible = rows;
                self.status_message = None;
            }
            Err(e) => {
                error!("Filtering failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle a single value in a column's multiselect.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        self.filters.toggle(column, value);
        self.refilter();
    }

    pub fn clear_filter(&mut self, column: &str) {
        self.filters.clear(column);
        self.refilter();
    }

    /// Write the currently filtered rows to `path`.
    pub fn export_filtered(&self, path: &Path) -> Result<()> {
        if let Some(ds) = &self.dataset {
            export::export_to_path(&self.visible.view(ds), path)?;
        }
        Ok(())
    }

    /// Write the whole dataset to `path`.
    pub fn export_all(&self, path: &Path) -> Result<()> {
        if let Some(ds) = &self.dataset {
            export::export_to_path(&RowSet::all(ds).view(ds), path)?;
        }
        Ok(())
    }
}

fn first_value(dataset: &Dataset, column: &str) -> Option<CellValue> {
    dataset
        .unique_values
        .get(column)
        .and_then(|vals| vals.iter().next().cloned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use marriage_explorer::data::loader::load_csv_reader;
    use marriage_explorer::data::model::{MARITAL_STATUS, SEX};

    const TEXT: &str = "Country,AgeGroup,Sex,MaritalStatus,Data Collection (Start Year),Data Collection (End Year)\n\
                        Chile,20-24,Female,Married,1990,1992\n\
                        Chile,25-29,Male,Single,2001,2002\n\
                        Peru,20-24,Female,Divorced,2010,2011\n";

    fn loaded() -> AppState {
        let mut state = AppState::new(Config::default());
        state.set_dataset(load_csv_reader(TEXT.as_bytes()).unwrap());
        state
    }

    #[test]
    fn loading_resets_selections() {
        let state = loaded();
        assert_eq!(state.visible.len(), 3);
        assert_eq!(state.scatter_x.as_deref(), Some("Data Collection (Start Year)"));
        assert_eq!(state.scatter_y.as_deref(), Some("Data Collection (End Year)"));
        assert_eq!(state.viz.country, Some(CellValue::String("Chile".into())));
        assert_eq!(state.viz.years, Some(YearRange { start: 1990, end: 2011 }));
    }

    #[test]
    fn toggling_refilters_and_rebuilds_report() {
        let mut state = loaded();
        state.toggle_filter_value(COUNTRY, &CellValue::String("Chile".into()));
        assert_eq!(state.visible.indices, vec![0, 1]);

        let report = state.report.as_ref().unwrap();
        let counted: usize = report
            .status_share
            .as_ref()
            .unwrap()
            .iter()
            .map(|p| p.count)
            .sum();
        assert_eq!(counted, 2);

        state.clear_filter(COUNTRY);
        assert_eq!(state.visible.len(), 3);
    }

    #[test]
    fn upstream_change_prunes_downstream_selection() {
        let mut state = loaded();
        state.toggle_filter_value(SEX, &CellValue::String("Male".into()));
        assert_eq!(state.visible.indices, vec![1]);

        state.toggle_filter_value(COUNTRY, &CellValue::String("Peru".into()));
        assert!(state.filters.selected(SEX).unwrap().is_empty());
        assert_eq!(state.visible.indices, vec![2]);
        assert!(state.filters.selected(MARITAL_STATUS).is_none());
    }

    #[test]
    fn missing_file_becomes_status_message() {
        let mut state = AppState::new(Config::default());
        state.load_path(Path::new("no/such/file.csv"));
        assert!(state.dataset.is_none());
        assert!(state.status_message.unwrap().starts_with("Error:"));
    }
}
