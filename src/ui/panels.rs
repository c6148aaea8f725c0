use std::path::Path;
use std::sync::Arc;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};
use egui_extras::{Column, TableBuilder};

use crate::chart::ChartType;
use crate::config::Source;
use crate::data::export::DEFAULT_EXPORT_NAME;
use crate::data::filter::{MAX_AGE, Order};
use crate::data::model::PopulationRow;
use crate::state::{AppState, SourceSlot};

/// Slider step, in years.
const AGE_STEP: f64 = 5.0;

// ---------------------------------------------------------------------------
// Left side panel – range, chart type, sources, rankings
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Age range");
            ui.separator();

            let mut min = state.age_min;
            let mut max = state.age_max;
            let min_changed = ui
                .add(Slider::new(&mut min, 0..=MAX_AGE).step_by(AGE_STEP).text("from"))
                .changed();
            let max_changed = ui
                .add(Slider::new(&mut max, 0..=MAX_AGE).step_by(AGE_STEP).text("to"))
                .changed();
            if min_changed || max_changed {
                state.set_range(min, max, min_changed);
            }

            ui.add_space(8.0);
            ui.heading("Chart");
            ui.separator();
            ui.horizontal_wrapped(|ui: &mut Ui| {
                let pyramid_ok = state.has_sex_split();
                for chart in ChartType::ALL {
                    let enabled = chart != ChartType::Pyramid || pyramid_ok;
                    let radio = egui::RadioButton::new(state.chart_type == chart, chart.label());
                    let response = ui
                        .add_enabled(enabled, radio)
                        .on_disabled_hover_text("Upload the by-sex table to draw a pyramid");
                    if response.clicked() {
                        state.chart_type = chart;
                    }
                }
            });

            ui.add_space(8.0);
            ui.heading("Sources");
            ui.separator();
            source_row(ui, state, SourceSlot::Total, "Total");
            source_row(ui, state, SourceSlot::SexSplit, "By sex");

            if state.dashboard.is_some() {
                let by_sex = state.has_sex_split();
                ui.add_space(8.0);
                ranking_table(ui, "largest", "Largest age groups", &state.ranking(Order::Largest), by_sex);
                ui.add_space(8.0);
                ranking_table(ui, "smallest", "Smallest age groups", &state.ranking(Order::Smallest), by_sex);
            }
        });
}

fn source_row(ui: &mut Ui, state: &mut AppState, slot: SourceSlot, title: &str) {
    let current = match slot {
        SourceSlot::Total => state.total.as_ref(),
        SourceSlot::SexSplit => state.sex_split.as_ref(),
    }
    .map(|s| s.display_name())
    .unwrap_or_else(|| "(none)".to_string());

    ui.horizontal(|ui: &mut Ui| {
        ui.strong(title);
        ui.label(current);
        if ui.small_button("Upload…").clicked() {
            upload_dialog(state, slot);
        }
    });
}

fn ranking_table(ui: &mut Ui, id: &str, title: &str, rows: &[&PopulationRow], by_sex: bool) {
    let names: &[&str] = if by_sex {
        &["Age", "Total", "Male", "Female"]
    } else {
        &["Age", "Total"]
    };
    ui.strong(title);
    ui.push_id(id, |ui: &mut Ui| {
        let mut table = TableBuilder::new(ui)
            .striped(true)
            .column(Column::auto().at_least(48.0));
        if by_sex {
            table = table
                .column(Column::auto().at_least(64.0))
                .column(Column::auto().at_least(56.0));
        }
        table
            .column(Column::remainder())
            .header(18.0, |mut header| {
                for &name in names {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|mut body| {
                for row in rows {
                    body.row(16.0, |mut table_row| {
                        table_row.col(|ui: &mut Ui| {
                            ui.label(row.age_label.as_str());
                        });
                        let counts = [row.total, row.male, row.female];
                        let shown = if by_sex { &counts[..] } else { &counts[..1] };
                        for value in shown {
                            table_row.col(|ui: &mut Ui| {
                                ui.label(value.to_string());
                            });
                        }
                    });
                }
            });
    });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Upload total table…").clicked() {
                upload_dialog(state, SourceSlot::Total);
                ui.close_menu();
            }
            if ui.button("Upload by-sex table…").clicked() {
                upload_dialog(state, SourceSlot::SexSplit);
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload").clicked() {
                state.refresh();
                ui.close_menu();
            }
            let can_export = state.dashboard.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(d) = &state.dashboard {
            ui.label(format!(
                "{} age groups loaded, {} visible{}",
                d.table.len(),
                d.visible.len(),
                if d.table.has_sex_split() { "" } else { " (total only)" }
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs and drag & drop
// ---------------------------------------------------------------------------

/// Snapshot a CSV into memory as an uploaded source.
fn upload_file(state: &mut AppState, slot: SourceSlot, path: &Path) {
    match std::fs::read(path) {
        Ok(bytes) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            state.set_source(
                slot,
                Source::Stream {
                    name,
                    bytes: Arc::from(bytes),
                },
            );
        }
        Err(e) => {
            log::error!("Failed to read {}: {e}", path.display());
            state.status_message = Some(format!("Error: cannot read {}: {e}", path.display()));
        }
    }
}

pub fn upload_dialog(state: &mut AppState, slot: SourceSlot) {
    let title = match slot {
        SourceSlot::Total => "Upload total population by age",
        SourceSlot::SexSplit => "Upload population by age and sex",
    };
    let file = rfd::FileDialog::new()
        .set_title(title)
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        upload_file(state, slot, &path);
    }
}

/// Take files dropped onto the window. Which table a file is meant for is
/// read from its name (`..._남녀.csv` is the by-sex export).
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    for file in dropped {
        let name = file
            .path
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file.name.clone());
        let slot = slot_for_file_name(&name);
        if let Some(bytes) = file.bytes {
            state.set_source(slot, Source::Stream { name, bytes });
        } else if let Some(path) = file.path {
            upload_file(state, slot, &path);
        }
    }
}

pub fn slot_for_file_name(name: &str) -> SourceSlot {
    let lower = name.to_lowercase();
    if name.contains("남녀") || lower.contains("sex") {
        SourceSlot::SexSplit
    } else {
        SourceSlot::Total
    }
}

pub fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered table")
        .set_file_name(DEFAULT_EXPORT_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_visible(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dropped_file_slot_from_name() {
        assert_eq!(slot_for_file_name("202504_202504_연령별인구현황_남녀.csv"), SourceSlot::SexSplit);
        assert_eq!(slot_for_file_name("population_by_sex.csv"), SourceSlot::SexSplit);
        assert_eq!(slot_for_file_name("202504_202504_연령별인구현황_계.csv"), SourceSlot::Total);
        assert_eq!(slot_for_file_name("population_total.csv"), SourceSlot::Total);
    }
}
