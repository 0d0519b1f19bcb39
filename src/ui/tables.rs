use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use marriage_explorer::analysis::describe::{ColumnInfo, ColumnSummary};

const ROW_HEIGHT: f32 = 18.0;

fn fmt_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.4}")
    }
}

/// `describe()` layout: statistics down, numeric columns across.
pub fn summary_table(ui: &mut Ui, id: &str, summary: &[ColumnSummary]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(60.0))
            .columns(Column::auto().at_least(90.0), summary.len())
            .header(ROW_HEIGHT, |mut header| {
                header.col(|_ui| {});
                for s in summary {
                    header.col(|ui| {
                        ui.strong(&s.column);
                    });
                }
            })
            .body(|mut body| {
                for stat in 0..8 {
                    body.row(ROW_HEIGHT, |mut row| {
                        let label = summary.first().map(|s| s.rows()[stat].0).unwrap_or("");
                        row.col(|ui| {
                            ui.strong(label);
                        });
                        for s in summary {
                            row.col(|ui| {
                                ui.monospace(fmt_stat(s.rows()[stat].1));
                            });
                        }
                    });
                }
            });
    });
}

/// `info()` layout: one line per column.
pub fn info_table(ui: &mut Ui, id: &str, info: &[ColumnInfo], total_rows: usize) {
    ui.label(format!("{total_rows} entries, {} columns", info.len()));
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(200.0))
            .column(Column::auto().at_least(100.0))
            .column(Column::auto())
            .header(ROW_HEIGHT, |mut header| {
                for title in ["Column", "Non-Null Count", "Dtype"] {
                    header.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for c in info {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(&c.column);
                        });
                        row.col(|ui| {
                            ui.monospace(format!("{} non-null", c.non_null));
                        });
                        row.col(|ui| {
                            ui.monospace(c.kind.to_string());
                        });
                    });
                }
            });
    });
}

/// Two-column `name | value` table.
pub fn key_value_table<V: ToString>(ui: &mut Ui, id: &str, header: [&str; 2], rows: &[(String, V)]) {
    ui.push_id(id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(200.0))
            .column(Column::auto())
            .header(ROW_HEIGHT, |mut h| {
                for title in header {
                    h.col(|ui| {
                        ui.strong(title);
                    });
                }
            })
            .body(|mut body| {
                for (name, value) in rows {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui| {
                            ui.label(name);
                        });
                        row.col(|ui| {
                            ui.monospace(value.to_string());
                        });
                    });
                }
            });
    });
}
