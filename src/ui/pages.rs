use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use marriage_explorer::analysis::counts;
use marriage_explorer::analysis::scatter::scatter_points;
use marriage_explorer::data::filter::{filter_equals, YearRange};
use marriage_explorer::data::model::{CellValue, Dataset, AGE_GROUP, COUNTRY, MARITAL_STATUS, SEX};
use marriage_explorer::{AnalysisError, ExplorationReport};

use super::{panels, plot, tables};
use crate::state::{AppState, Page};

/// Render the selected page in the central panel.
pub fn show(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.page {
            Page::Home => home(ui),
            Page::Exploration => exploration(ui, state),
            Page::Visualizations => visualizations(ui, state),
            Page::Insights => insights(ui),
            Page::Download => download(ui, state),
        });
}

/// Shown when no dataset could be loaded. Returns `true` in that case.
fn missing_dataset(ui: &mut Ui, state: &AppState) -> bool {
    if state.dataset.is_some() {
        return false;
    }
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(format!(
            "Could not load {}  (File → Open… to pick another file)",
            state.config.dataset_path.display()
        ));
    });
    true
}

fn skipped(ui: &mut Ui, err: &AnalysisError) {
    ui.label(RichText::new(err.to_string()).italics());
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

fn home(ui: &mut Ui) {
    ui.heading("🌍 World Marriage Dataset Analysis");
    ui.label(
        "Explore how marital status varies by age, sex and country, and how it \
         changes across data-collection periods.",
    );
    ui.add_space(8.0);
    ui.strong("What you can do");
    ui.label("• Data Exploration: preview the dataset, filter it and inspect statistics.");
    ui.label("• Visualizations: compare distributions by country, age group and period.");
    ui.label("• Download: export the dataset, or the filtered view, as CSV.");
    ui.add_space(8.0);
    ui.strong("About the dataset");
    ui.label(
        "Marital status by country, age group and sex. Data collection periods \
         vary by country.",
    );
}

fn insights(ui: &mut Ui) {
    ui.heading("Insights");
    ui.label("Add your analysis and insights here.");
}

// ---------------------------------------------------------------------------
// Data exploration
// ---------------------------------------------------------------------------

fn exploration(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data Exploration");
    if missing_dataset(ui, state) {
        return;
    }

    if let (Some(ds), Some(overview)) = (&state.dataset, &state.overview) {
        ui.heading("Dataset Overview");
        ui.strong("Basic Statistics");
        match &overview.summary {
            Ok(summary) => tables::summary_table(ui, "overview_describe", summary),
            Err(e) => skipped(ui, e),
        }
        ui.strong("Data Summary");
        tables::info_table(ui, "overview_info", &overview.column_info, ds.len());
        ui.strong("Data Distribution");
        match &overview.status_counts {
            Ok(c) => plot::counts_bar_chart(ui, "overview_status", c),
            Err(e) => skipped(ui, e),
        }
    }

    ui.separator();
    ui.heading("Interactive Filters");
    panels::filter_widgets(ui, state);

    // Taken out for the duration of the frame so sections can borrow state.
    let Some(report) = state.report.take() else {
        return;
    };
    filtered_sections(ui, state, &report);
    state.report = Some(report);
}

fn filtered_sections(ui: &mut Ui, state: &mut AppState, report: &ExplorationReport) {
    ui.label(format!("{} rows match the current filters.", report.row_count));

    ui.separator();
    data_visualizations(ui, report);
    ui.separator();
    correlation_analysis(ui, state, report);
    ui.separator();
    missing_values_analysis(ui, report);
    ui.separator();
    data_quality_checks(ui, report);

    ui.separator();
    ui.label("Download Filtered Data:");
    if ui.button("Download Filtered Data").clicked() {
        panels::save_file_dialog(state, true);
    }
}

fn data_visualizations(ui: &mut Ui, report: &ExplorationReport) {
    ui.heading("Data Visualizations");
    match &report.status_by_sex {
        Ok(g) => plot::grouped_bar_chart(ui, "status_by_sex", "Marital Status Distribution", g),
        Err(e) => skipped(ui, e),
    }
    match &report.status_by_age {
        Ok(g) => plot::grouped_bar_chart(ui, "status_by_age", "Marital Status by Age Group", g),
        Err(e) => skipped(ui, e),
    }
    ui.strong("Proportion of Marital Status");
    match &report.status_share {
        Ok(slices) => plot::pie_chart(ui, "status_share", slices),
        Err(e) => skipped(ui, e),
    }
}

fn correlation_analysis(ui: &mut Ui, state: &mut AppState, report: &ExplorationReport) {
    ui.heading("Correlation Analysis");
    let matrix = match &report.correlation {
        Ok(m) => m,
        Err(e) => {
            skipped(ui, e);
            return;
        }
    };
    ui.strong("Correlation Matrix");
    plot::correlation_heatmap(ui, matrix);

    ui.strong("Scatter Plots");
    let axes = match &report.scatter_axes {
        Ok(a) => a,
        Err(e) => {
            skipped(ui, e);
            return;
        }
    };
    axis_selector(ui, "scatter_x", "Select X-axis Column", axes, &mut state.scatter_x);
    axis_selector(ui, "scatter_y", "Select Y-axis Column", axes, &mut state.scatter_y);

    let (Some(ds), Some(x), Some(y)) = (&state.dataset, &state.scatter_x, &state.scatter_y) else {
        return;
    };
    match scatter_points(&state.visible.view(ds), x, y) {
        Ok(points) => plot::scatter_plot(ui, x, y, points),
        Err(e) => skipped(ui, &e),
    }
}

fn axis_selector(ui: &mut Ui, id: &str, label: &str, axes: &[String], current: &mut Option<String>) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.clone().unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for axis in axes {
                    ui.selectable_value(current, Some(axis.clone()), axis);
                }
            });
    });
}

fn missing_values_analysis(ui: &mut Ui, report: &ExplorationReport) {
    ui.heading("Missing Values Analysis");
    ui.strong("Heatmap of Missing Values");
    plot::missing_heatmap(ui, &report.null_counts, &report.missing_mask);
    ui.strong("Missing Data Statistics");
    tables::key_value_table(ui, "null_counts", ["Column", "Missing"], &report.null_counts);
}

fn data_quality_checks(ui: &mut Ui, report: &ExplorationReport) {
    ui.heading("Data Quality Checks");

    ui.strong("Missing Values");
    if report.columns_with_missing.is_empty() {
        ui.label("No missing values.");
    } else {
        tables::key_value_table(
            ui,
            "quality_missing",
            ["Column", "Missing"],
            &report.columns_with_missing,
        );
    }

    ui.strong("Duplicate Rows");
    ui.label(format!("Number of duplicate rows: {}", report.duplicate_rows));

    ui.strong("Data Types");
    tables::key_value_table(ui, "quality_types", ["Column", "Dtype"], &report.column_types);

    ui.strong("Outlier Analysis");
    match &report.boxplots {
        Ok(boxes) => {
            for stats in boxes {
                plot::boxplot(ui, stats);
            }
        }
        Err(e) => {
            skipped(ui, e);
            return;
        }
    }

    ui.strong("Summary Statistics");
    match &report.summary {
        Ok(summary) => tables::summary_table(ui, "quality_describe", summary),
        Err(e) => skipped(ui, e),
    }
}

// ---------------------------------------------------------------------------
// Visualizations
// ---------------------------------------------------------------------------

fn visualizations(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Visualizations");
    if missing_dataset(ui, state) {
        return;
    }
    let Some(ds) = &state.dataset else {
        return;
    };

    ui.heading("Marital Status Distribution");
    value_picker(ui, ds, "viz_country", "Select Country", COUNTRY, &mut state.viz.country);
    if let Some(country) = &state.viz.country {
        let title = format!("Distribution of Marital Status in {}", country.label());
        single_value_histogram(ui, ds, "viz_country_chart", &title, COUNTRY, country, SEX);
    }

    ui.heading("Marital Status by Age Group");
    value_picker(ui, ds, "viz_age", "Select Age Group", AGE_GROUP, &mut state.viz.age_group);
    if let Some(age) = &state.viz.age_group {
        let title = format!("Distribution of Marital Status in Age Group {}", age.label());
        single_value_histogram(ui, ds, "viz_age_chart", &title, AGE_GROUP, age, COUNTRY);
    }

    ui.heading("Marital Status Trends Over Time");
    year_range_histogram(ui, ds, &mut state.viz.years);
}

fn value_picker(
    ui: &mut Ui,
    ds: &Dataset,
    id: &str,
    label: &str,
    column: &str,
    current: &mut Option<CellValue>,
) {
    let Some(values) = ds.unique_values.get(column) else {
        skipped(ui, &AnalysisError::ColumnNotFound(column.to_string()));
        return;
    };
    ui.horizontal(|ui: &mut Ui| {
        ui.label(label);
        egui::ComboBox::from_id_salt(id)
            .selected_text(current.as_ref().map(CellValue::label).unwrap_or_default())
            .show_ui(ui, |ui: &mut Ui| {
                for v in values {
                    ui.selectable_value(current, Some(v.clone()), v.label());
                }
            });
    });
}

/// Marital status counts for rows where `column == value`, split by `group`.
fn single_value_histogram(
    ui: &mut Ui,
    ds: &Dataset,
    id: &str,
    title: &str,
    column: &str,
    value: &CellValue,
    group: &str,
) {
    let grouped = filter_equals(ds, column, value)
        .and_then(|rows| counts::grouped_counts(&rows.view(ds), MARITAL_STATUS, group));
    match grouped {
        Ok(g) => plot::grouped_bar_chart(ui, id, title, &g),
        Err(e) => skipped(ui, &e),
    }
}

fn year_range_histogram(ui: &mut Ui, ds: &Dataset, years: &mut Option<YearRange>) {
    let bounds = match YearRange::bounds(ds) {
        Ok(Some(b)) => b,
        Ok(None) => {
            ui.label("No data-collection years available.");
            return;
        }
        Err(e) => {
            skipped(ui, &e);
            return;
        }
    };
    let range = years.get_or_insert(bounds);

    ui.label("Select Year Range");
    ui.add(egui::Slider::new(&mut range.start, bounds.start..=bounds.end).text("from"));
    ui.add(egui::Slider::new(&mut range.end, bounds.start..=bounds.end).text("to"));
    if range.start > range.end {
        ui.label(RichText::new("Start year is after end year.").color(Color32::YELLOW));
    }

    let title = format!(
        "Distribution of Marital Status from {} to {}",
        range.start, range.end
    );
    let grouped = range
        .apply(ds)
        .and_then(|rows| counts::grouped_counts(&rows.view(ds), MARITAL_STATUS, COUNTRY));
    match grouped {
        Ok(g) => plot::grouped_bar_chart(ui, "viz_years_chart", &title, &g),
        Err(e) => skipped(ui, &e),
    }
}

// ---------------------------------------------------------------------------
// Download
// ---------------------------------------------------------------------------

fn download(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Download Data");
    if missing_dataset(ui, state) {
        return;
    }
    ui.label("Download the full dataset:");
    if ui.button("Download Data").clicked() {
        panels::save_file_dialog(state, false);
    }
    if !state.filters.is_unfiltered() {
        ui.add_space(8.0);
        ui.label(format!(
            "Or only the {} rows matching the exploration filters:",
            state.visible.len()
        ));
        if ui.button("Download Filtered Data").clicked() {
            panels::save_file_dialog(state, true);
        }
    }
}
