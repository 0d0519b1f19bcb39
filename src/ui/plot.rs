use std::f64::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, Sense, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoint, PlotPoints, Points,
    Polygon, Text,
};

use crate::color::{correlation_color, sequential, ColorMap};
use marriage_explorer::analysis::boxplot::BoxStats;
use marriage_explorer::analysis::correlation::CorrelationMatrix;
use marriage_explorer::analysis::counts::{GroupedCounts, Proportion};
use marriage_explorer::data::model::CellValue;

const CHART_HEIGHT: f32 = 280.0;

/// Category labels under integer x positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > 1e-6 || pos < 0.0 {
            return String::new();
        }
        labels.get(pos as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Bar charts
// ---------------------------------------------------------------------------

/// One bar per category, as in a value-counts bar chart.
pub fn counts_bar_chart(ui: &mut Ui, id: &str, counts: &[(CellValue, usize)]) {
    let labels: Vec<String> = counts.iter().map(|(v, _)| v.label()).collect();
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (v, n))| Bar::new(i as f64, *n as f64).name(v.label()).width(0.7))
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(labels))
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(Color32::LIGHT_BLUE));
        });
}

/// Side-by-side bars: one chart per group, offset within each category slot.
pub fn grouped_bar_chart(ui: &mut Ui, id: &str, title: &str, grouped: &GroupedCounts) {
    ui.strong(title);
    if grouped.categories.is_empty() {
        ui.label("No rows to plot.");
        return;
    }

    let n_groups = grouped.groups.len().max(1) as f64;
    let slot = 0.8;
    let bar_width = slot / n_groups;
    let colors = ColorMap::new(&grouped.groups);
    let labels: Vec<String> = grouped.categories.iter().map(CellValue::label).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_formatter(category_axis(labels))
        .x_axis_label(grouped.x_column.as_str())
        .y_axis_label("count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (g, group) in grouped.groups.iter().enumerate() {
                let offset = -slot / 2.0 + bar_width * (g as f64 + 0.5);
                let bars: Vec<Bar> = grouped.counts[g]
                    .iter()
                    .enumerate()
                    .map(|(c, n)| Bar::new(c as f64 + offset, *n as f64).width(bar_width))
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(format!("{}={}", grouped.group_column, group.label()))
                        .color(colors.color_for(group)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Pie chart
// ---------------------------------------------------------------------------

/// Pie chart drawn as filled wedges on an equal-aspect plot.
pub fn pie_chart(ui: &mut Ui, id: &str, slices: &[Proportion]) {
    if slices.is_empty() {
        ui.label("No rows to plot.");
        return;
    }
    let values: Vec<CellValue> = slices.iter().map(|p| p.value.clone()).collect();
    let colors = ColorMap::new(&values);

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .legend(Legend::default())
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let mut start = 0.0;
            for slice in slices {
                let sweep = slice.fraction * TAU;
                plot_ui.polygon(
                    Polygon::new(wedge(start, sweep))
                        .name(format!("{} ({:.1}%)", slice.value.label(), slice.fraction * 100.0))
                        .fill_color(colors.color_for(&slice.value))
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
                start += sweep;
            }
        });
}

/// Unit-circle wedge starting at 12 o'clock, clockwise.
fn wedge(start: f64, sweep: f64) -> PlotPoints<'static> {
    let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
    let mut points = vec![[0.0, 0.0]];
    points.extend((0..=steps).map(|k| {
        let angle = start + sweep * k as f64 / steps as f64;
        [angle.sin(), angle.cos()]
    }));
    PlotPoints::from(points)
}

// ---------------------------------------------------------------------------
// Correlation heatmap / scatter
// ---------------------------------------------------------------------------

pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.columns.len();
    let labels = matrix.columns.clone();

    Plot::new("correlation_heatmap")
        .height(CHART_HEIGHT.max(60.0 * n as f32))
        .data_aspect(1.0)
        .show_grid(false)
        .allow_scroll(false)
        .x_axis_formatter(category_axis(labels.clone()))
        .y_axis_formatter(category_axis(labels))
        .x_axis_label("Variables")
        .y_axis_label("Variables")
        .show(ui, |plot_ui| {
            for (i, row) in matrix.values.iter().enumerate() {
                for (j, r) in row.iter().enumerate() {
                    let (x, y) = (j as f64, i as f64);
                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(cell))
                            .fill_color(correlation_color(*r))
                            .stroke(Stroke::NONE),
                    );
                    let label = if r.is_nan() { "n/a".to_string() } else { format!("{r:.2}") };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(label).color(Color32::WHITE),
                    ));
                }
            }
        });
}

pub fn scatter_plot(ui: &mut Ui, x_label: &str, y_label: &str, points: Vec<[f64; 2]>) {
    ui.label(format!("Scatter Plot of {x_label} vs {y_label}"));
    Plot::new("scatter_plot")
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::from(points))
                    .radius(2.5)
                    .color(Color32::LIGHT_BLUE),
            );
        });
}

// ---------------------------------------------------------------------------
// Boxplots
// ---------------------------------------------------------------------------

pub fn boxplot(ui: &mut Ui, stats: &BoxStats) {
    ui.label(format!("Boxplot of {}", stats.column));
    let spread = BoxSpread::new(
        stats.lower_whisker,
        stats.q1,
        stats.median,
        stats.q3,
        stats.upper_whisker,
    );
    let outliers: Vec<[f64; 2]> = stats.outliers.iter().map(|v| [0.0, *v]).collect();

    Plot::new(("boxplot", stats.column.as_str()))
        .height(CHART_HEIGHT)
        .show_x(false)
        .allow_scroll(false)
        .y_axis_label(stats.column.as_str())
        .show(ui, |plot_ui| {
            plot_ui.box_plot(
                BoxPlot::new(vec![BoxElem::new(0.0, spread).box_width(0.5)])
                    .name(stats.column.as_str())
                    .color(Color32::LIGHT_BLUE),
            );
            if !outliers.is_empty() {
                plot_ui.points(
                    Points::new(PlotPoints::from(outliers))
                        .radius(3.0)
                        .color(Color32::LIGHT_RED)
                        .name("outliers"),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Missing-value heatmap
// ---------------------------------------------------------------------------

/// Rows are bucketed so tall tables fit; each cell shades by the share of
/// missing values in its bucket.
pub fn missing_heatmap(ui: &mut Ui, columns: &[(String, usize)], mask: &[Vec<bool>]) {
    const MAX_BANDS: usize = 200;
    if mask.is_empty() || columns.is_empty() {
        ui.label("No rows to plot.");
        return;
    }

    let bands = mask.len().min(MAX_BANDS);
    let rows_per_band = mask.len().div_ceil(bands);
    let width = ui.available_width().min(900.0);
    let height = 240.0;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), Sense::hover());
    let painter = ui.painter_at(rect);
    let cell_w = width / columns.len() as f32;
    let cell_h = height / bands as f32;

    for (band, chunk) in mask.chunks(rows_per_band).enumerate() {
        for col in 0..columns.len() {
            let missing = chunk.iter().filter(|row| row[col]).count();
            let share = missing as f64 / chunk.len() as f64;
            let min = rect.min + egui::vec2(col as f32 * cell_w, band as f32 * cell_h);
            let cell = egui::Rect::from_min_size(min, egui::vec2(cell_w, cell_h));
            painter.rect_filled(cell, 0.0, sequential(share));
        }
    }

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (name, _) in columns {
            ui.small(name);
        }
    });
}
