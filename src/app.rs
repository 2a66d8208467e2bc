use eframe::egui;

use crate::figure::Figure;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct QmcPlotApp {
    pub state: ViewerState,
}

impl QmcPlotApp {
    pub fn new(figure: Figure) -> Self {
        Self {
            state: ViewerState::new(figure),
        }
    }
}

impl eframe::App for QmcPlotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: series and tables ----
        egui::SidePanel::left("series_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_plot(ui, &mut self.state);
        });
    }
}

/// Open a window showing `figure`; returns when the window is closed.
pub fn run_viewer(figure: Figure) -> anyhow::Result<()> {
    let [w, h] = figure.config.theme.figure_size;
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([(w * 100.0) as f32 + 280.0, (h * 100.0) as f32 + 40.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    let title = match figure.output().file_name() {
        Some(name) => format!("QMC Plot – {}", name.to_string_lossy()),
        None => "QMC Plot".to_string(),
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(QmcPlotApp::new(figure)))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}
