use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::table::MeasurementTable;
use crate::render::text::display_label;
use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Left side panel – series toggles and data tables
// ---------------------------------------------------------------------------

/// Render the left panel.
pub fn side_panel(ui: &mut Ui, state: &mut ViewerState) {
    ui.heading("Series");
    ui.separator();

    let usetex = state.figure.config.theme.usetex;

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.set_all(true);
        }
        if ui.small_button("None").clicked() {
            state.set_all(false);
        }
    });

    for i in 0..state.figure.series.len() {
        let series = &state.figure.series[i];
        let c = series.style.color;
        let text = RichText::new(display_label(&series.style.label, usetex))
            .color(Color32::from_rgb(c.red, c.green, c.blue));
        let mut checked = state.visible[i];
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle(i);
        }
    }

    ui.separator();
    ui.add(egui::Slider::new(&mut state.digits, 1..=3).text("uncertainty digits"));
    ui.separator();

    let digits = state.digits;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, (origin, table)) in state.figure.tables().enumerate() {
                egui::CollapsingHeader::new(RichText::new(format!("{origin}  ({} rows)", table.len())).strong())
                    .id_salt(i)
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.push_id(i, |ui: &mut Ui| data_table(ui, table, digits));
                    });
            }
        });
}

fn data_table(ui: &mut Ui, table: &MeasurementTable, digits: usize) {
    let rows = table.to_shorthand(digits);
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto().at_least(60.0), table.headers.len())
        .header(20.0, |mut header| {
            for name in &table.headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|mut body| {
            for row in &rows {
                body.row(18.0, |mut cells| {
                    for value in row {
                        cells.col(|ui: &mut Ui| {
                            ui.monospace(value);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export…").clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        if ui.button("Reset view").clicked() {
            state.reset_view = true;
        }

        ui.separator();

        ui.label(format!(
            "{} series loaded, {} visible",
            state.figure.series.len(),
            state.visible_series().count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_file_dialog(state: &mut ViewerState) {
    let default_name = state
        .figure
        .output()
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "figure.pdf".to_string());

    let file = rfd::FileDialog::new()
        .set_title("Export figure")
        .set_file_name(default_name)
        .add_filter("Supported files", &["pdf", "svg", "png"])
        .add_filter("PDF", &["pdf"])
        .add_filter("SVG", &["svg"])
        .add_filter("PNG", &["png"])
        .save_file();

    if let Some(path) = file {
        match state.export(&path) {
            Ok(()) => {
                log::info!("Exported figure to {}", path.display());
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export figure: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
