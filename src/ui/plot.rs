use eframe::egui::{Color32, Ui};
use egui_plot::{
    HLine, Legend, Line, LineStyle as PlotLineStyle, MarkerShape, Plot, PlotBounds, PlotPoints,
    Points,
};

use crate::color::{parse_color, Rgb8};
use crate::render::text::display_label;
use crate::state::ViewerState;
use crate::style::{LineStyle, Marker};

fn color32(c: Rgb8) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

fn marker_shape(marker: Marker) -> Option<MarkerShape> {
    match marker {
        Marker::Square => Some(MarkerShape::Square),
        Marker::Circle => Some(MarkerShape::Circle),
        Marker::TriangleUp => Some(MarkerShape::Up),
        Marker::TriangleDown => Some(MarkerShape::Down),
        Marker::Diamond => Some(MarkerShape::Diamond),
        Marker::None => None,
    }
}

// ---------------------------------------------------------------------------
// Error-bar plot (central panel)
// ---------------------------------------------------------------------------

/// Render the figure's visible series in the central panel. The view starts
/// at the figure's axis ranges and returns there on a view reset.
pub fn figure_plot(ui: &mut Ui, state: &mut ViewerState) {
    let reset = state.take_view_reset().then(|| state.view_bounds());
    let state = &*state;
    let config = &state.figure.config;
    let usetex = config.theme.usetex;

    Plot::new("figure_plot")
        .legend(Legend::default())
        .x_axis_label(display_label(&config.x_label, usetex))
        .y_axis_label(display_label(&config.y_label, usetex))
        .show_grid(config.grid_alpha.is_some())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .allow_double_click_reset(false)
        .show(ui, |plot_ui| {
            if let Some((min, max)) = reset {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(min, max));
            }

            for hline in &config.hlines {
                let color = parse_color(&hline.color)
                    .map(color32)
                    .unwrap_or(Color32::RED)
                    .gamma_multiply(hline.alpha as f32);
                let mut line = HLine::new(hline.y)
                    .color(color)
                    .width(hline.line_width as f32);
                if hline.dashed {
                    line = line.style(PlotLineStyle::dashed_dense());
                }
                plot_ui.hline(line);
            }

            for series in state.visible_series() {
                let style = &series.style;
                let name = display_label(&style.label, usetex);
                let width = style.line_width as f32;

                // Error bars stay unnamed so the legend shows one entry per series.
                for (x, y, e) in series.data.points().filter(|&(_, _, e)| e > 0.0) {
                    let bar = PlotPoints::from(vec![[x, y - e], [x, y + e]]);
                    plot_ui.line(Line::new(bar).color(color32(style.ecolor)).width(width));
                }

                let points: PlotPoints = series.data.points().map(|(x, y, _)| [x, y]).collect();
                let line_style = match &style.line_style {
                    LineStyle::None => None,
                    LineStyle::Solid => Some(PlotLineStyle::Solid),
                    LineStyle::Dashed { dashes } => Some(PlotLineStyle::Dashed {
                        length: (dashes[0] * style.line_width) as f32,
                    }),
                };
                if let Some(line_style) = line_style {
                    plot_ui.line(
                        Line::new(points)
                            .name(&name)
                            .color(color32(style.color))
                            .style(line_style)
                            .width(width),
                    );
                }

                if let Some(shape) = marker_shape(style.marker) {
                    let markers: PlotPoints =
                        series.data.points().map(|(x, y, _)| [x, y]).collect();
                    plot_ui.points(
                        Points::new(markers)
                            .name(&name)
                            .color(color32(style.color))
                            .shape(shape)
                            .filled(true)
                            .radius((style.marker_size / 2.0) as f32),
                    );
                }
            }
        });
}
