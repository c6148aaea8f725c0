use std::ops::RangeInclusive;

use eframe::egui::{Color32, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points, Polygon};

use crate::chart::{ChartType, pie_slices, pyramid_bars, total_series};
use crate::color::{FEMALE_COLOR, MALE_COLOR, blue_scale, generate_palette};
use crate::data::model::PopulationRow;
use crate::state::AppState;

const TOTAL_COLOR: Color32 = Color32::from_rgb(31, 119, 180);

// ---------------------------------------------------------------------------
// Population chart (central panel)
// ---------------------------------------------------------------------------

/// Render the active chart in the central panel.
pub fn population_plot(ui: &mut Ui, state: &AppState) {
    let Some(dashboard) = &state.dashboard else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Upload a population table to view the chart  (File → Upload…)");
        });
        return;
    };

    if dashboard.table.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("The uploaded table has no age columns");
        });
        return;
    }

    let rows = state.visible_rows();
    if rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No age group in the selected range");
        });
        return;
    }

    match state.chart_type {
        ChartType::Bar => bar_plot(ui, &rows),
        ChartType::Line => line_plot(ui, &rows, false),
        ChartType::Area => line_plot(ui, &rows, true),
        ChartType::Pie => pie_plot(ui, &rows),
        ChartType::Pyramid if dashboard.table.has_sex_split() => pyramid_plot(ui, &rows),
        ChartType::Pyramid => bar_plot(ui, &rows),
    }
}

/// Axis formatter showing the age label at integer category positions.
fn category_axis(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || (v - v.round()).abs() > 1e-6 {
            return String::new();
        }
        labels.get(v.round() as usize).cloned().unwrap_or_default()
    }
}

fn bar_plot(ui: &mut Ui, rows: &[&PopulationRow]) {
    let series = total_series(rows.iter().copied());
    let max = series.iter().map(|p| p.value).fold(0.0, f64::max);
    let labels = series.iter().map(|p| p.label.clone()).collect();

    let bars: Vec<Bar> = series
        .iter()
        .map(|p| {
            Bar::new(p.x, p.value)
                .name(&p.label)
                .fill(blue_scale(p.value, max))
                .stroke(Stroke::new(0.5, Color32::BLACK))
                .width(0.8)
        })
        .collect();

    Plot::new("population_bar")
        .x_axis_label("Age")
        .y_axis_label("Population")
        .x_axis_formatter(category_axis(labels))
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Total"));
        });
}

fn line_plot(ui: &mut Ui, rows: &[&PopulationRow], filled: bool) {
    let series = total_series(rows.iter().copied());
    let labels = series.iter().map(|p| p.label.clone()).collect();
    let points: Vec<[f64; 2]> = series.iter().map(|p| [p.x, p.value]).collect();

    let id = if filled { "population_area" } else { "population_line" };
    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label("Age")
        .y_axis_label("Population")
        .x_axis_formatter(category_axis(labels))
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            let mut line = Line::new(PlotPoints::from(points.clone()))
                .name("Total")
                .color(TOTAL_COLOR)
                .width(2.0);
            if filled {
                line = line.fill(0.0_f32);
            } else {
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .radius(3.0)
                        .color(TOTAL_COLOR),
                );
            }
            plot_ui.line(line);
        });
}

fn pie_plot(ui: &mut Ui, rows: &[&PopulationRow]) {
    let slices = pie_slices(rows.iter().copied());
    let colors = generate_palette(slices.len());

    Plot::new("population_pie")
        .legend(Legend::default())
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (slice, color) in slices.iter().zip(colors) {
                // Arc resolution: roughly one vertex per degree.
                let steps = ((slice.end - slice.start).to_degrees().ceil() as usize).max(2);
                let mut outline: Vec<[f64; 2]> = Vec::with_capacity(steps + 2);
                outline.push([0.0, 0.0]);
                for s in 0..=steps {
                    let angle = slice.start + (slice.end - slice.start) * s as f64 / steps as f64;
                    outline.push([-angle.sin(), angle.cos()]);
                }
                let name = format!("{} ({:.1}%)", slice.label, slice.fraction * 100.0);
                plot_ui.polygon(
                    Polygon::new(PlotPoints::from(outline))
                        .name(name)
                        .fill_color(color)
                        .stroke(Stroke::new(1.0, Color32::WHITE)),
                );
            }
        });
}

fn pyramid_plot(ui: &mut Ui, rows: &[&PopulationRow]) {
    let bars = pyramid_bars(rows.iter().copied());
    let labels = bars.iter().map(|b| b.label.clone()).collect();

    let male: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::new(b.y, b.male)
                .name(&b.label)
                .fill(MALE_COLOR)
                .stroke(Stroke::new(1.0, Color32::DARK_BLUE))
                .width(0.9)
        })
        .collect();
    let female: Vec<Bar> = bars
        .iter()
        .map(|b| {
            Bar::new(b.y, b.female)
                .name(&b.label)
                .fill(FEMALE_COLOR)
                .stroke(Stroke::new(1.0, Color32::DARK_RED))
                .width(0.9)
        })
        .collect();

    Plot::new("population_pyramid")
        .legend(Legend::default())
        .x_axis_label("Population")
        .y_axis_label("Age")
        .y_axis_formatter(category_axis(labels))
        .x_axis_formatter(|mark, _range| format!("{}", mark.value.abs()))
        .allow_drag(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(male).name("Male").color(MALE_COLOR).horizontal());
            plot_ui.bar_chart(BarChart::new(female).name("Female").color(FEMALE_COLOR).horizontal());
        });
}
