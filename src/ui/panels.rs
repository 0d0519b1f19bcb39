use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – page navigation
// ---------------------------------------------------------------------------

pub fn navigation_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🌟 Navigation");
    ui.separator();
    ui.label("Go to");
    for page in Page::ALL {
        ui.radio_value(&mut state.page, page, page.title());
    }
}

// ---------------------------------------------------------------------------
// Interactive filters
// ---------------------------------------------------------------------------

/// Multiselect per filter column. Options cascade: each column only lists
/// values left by the selections above it.
pub fn filter_widgets(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };

    // Gather everything first so the loop below can mutate state.
    let mut columns = Vec::new();
    for selection in &state.filters.selections {
        let label = format!("Select {}", selection.column);
        match state.filters.options_for(dataset, &selection.column) {
            Ok(options) => columns.push((
                selection.column.clone(),
                label,
                options,
                selection.values.clone(),
            )),
            Err(e) => {
                ui.label(RichText::new(e.to_string()).color(Color32::RED));
            }
        }
    }

    for (column, label, options, selected) in columns {
        let header_text = if selected.is_empty() {
            format!("{label}  (all {})", options.len())
        } else {
            format!("{label}  ({}/{})", selected.len(), options.len())
        };

        egui::CollapsingHeader::new(RichText::new(header_text).strong())
            .id_salt(&column)
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                if ui.small_button("Clear").clicked() {
                    state.clear_filter(&column);
                }
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    for val in &options {
                        let mut checked = selected.contains(val);
                        if ui.checkbox(&mut checked, val.label()).changed() {
                            state.toggle_filter_value(&column, val);
                        }
                    }
                });
            });
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Export filtered…").clicked() {
                save_file_dialog(state, true);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} selected",
                ds.len(),
                state.visible.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open marriage dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

/// Ask for a target file and export either the filtered rows or the whole
/// dataset.
pub fn save_file_dialog(state: &mut AppState, filtered: bool) {
    let file = rfd::FileDialog::new()
        .set_title("Download data")
        .set_file_name(&state.config.export_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    let Some(path) = file else {
        return;
    };
    let result = if filtered {
        state.export_filtered(&path)
    } else {
        state.export_all(&path)
    };
    state.status_message = match result {
        Ok(()) => None,
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Some(format!("Error: {e:#}"))
        }
    };
}
