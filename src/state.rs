use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::figure::{Figure, PlotSeries};
use crate::render::save_figure;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The full viewer state, independent of rendering.
pub struct ViewerState {
    pub figure: Figure,

    /// Per-series visibility, parallel to `figure.series`.
    pub visible: Vec<bool>,

    /// Significant digits of the uncertainty in the data tables.
    pub digits: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Set when the plot view should jump back to the figure's axis ranges.
    pub reset_view: bool,
}

impl ViewerState {
    pub fn new(figure: Figure) -> Self {
        let visible = vec![true; figure.series.len()];
        Self {
            figure,
            visible,
            digits: 1,
            status_message: None,
            reset_view: true,
        }
    }

    /// Flip the visibility of one series; out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) {
        if let Some(v) = self.visible.get_mut(index) {
            *v = !*v;
        }
    }

    pub fn set_all(&mut self, visible: bool) {
        self.visible.iter_mut().for_each(|v| *v = visible);
    }

    pub fn visible_series(&self) -> impl Iterator<Item = &PlotSeries> {
        self.figure
            .series
            .iter()
            .zip(&self.visible)
            .filter_map(|(s, &shown)| shown.then_some(s))
    }

    /// A copy of the figure holding only the visible series.
    pub fn visible_figure(&self) -> Figure {
        Figure {
            config: self.figure.config.clone(),
            series: self.visible_series().cloned().collect(),
        }
    }

    /// `[min, max]` corners of the figure's axis ranges, limits included.
    pub fn view_bounds(&self) -> ([f64; 2], [f64; 2]) {
        let (x0, x1) = self.figure.x_range();
        let (y0, y1) = self.figure.y_range();
        ([x0, y0], [x1, y1])
    }

    /// Consume a pending view reset.
    pub fn take_view_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_view)
    }

    /// Save the visible series through the regular export path.
    pub fn export(&self, path: &Path) -> Result<()> {
        let figure = self.visible_figure();
        if figure.series.is_empty() {
            bail!("no visible series to export");
        }
        save_figure(&figure, path).with_context(|| format!("exporting to {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DataSource, FigurePreset, SeriesConfig, StyleSpec};

    fn two_series_state() -> ViewerState {
        let mut config = FigurePreset::Timestep.config();
        config.series.push(SeriesConfig {
            source: DataSource::Inline {
                x: vec![0.01, 0.02],
                y: vec![-2.245, -2.246],
                yerr: Some(vec![0.001, 0.001]),
            },
            style: StyleSpec::Preset("2eTmoves".into()),
            label: None,
        });
        ViewerState::new(Figure::from_config(config, Path::new(".")).unwrap())
    }

    #[test]
    fn everything_starts_visible() {
        let state = two_series_state();
        assert_eq!(state.visible, vec![true, true]);
        assert_eq!(state.visible_series().count(), 2);
    }

    #[test]
    fn toggling_hides_series_from_the_export_figure() {
        let mut state = two_series_state();
        state.toggle(0);
        state.toggle(7);

        let figure = state.visible_figure();
        assert_eq!(figure.series.len(), 1);
        assert_eq!(figure.series[0].style.label, "2e- ccECP Tmoves");
        assert_eq!(figure.config, state.figure.config);
    }

    #[test]
    fn export_without_visible_series_fails() {
        let mut state = two_series_state();
        state.set_all(false);
        let err = state.export(Path::new("out.svg")).unwrap_err();
        assert!(err.to_string().contains("no visible series"));
    }

    #[test]
    fn view_is_pinned_to_the_configured_limits() {
        let state = two_series_state();
        let ([_, y0], [_, y1]) = state.view_bounds();
        // the reference line at y = 0 stays outside the view
        assert_eq!((y0, y1), (-2.26, -2.24));
    }

    #[test]
    fn view_reset_is_consumed_once() {
        let mut state = two_series_state();
        assert!(state.take_view_reset());
        assert!(!state.take_view_reset());

        state.reset_view = true;
        assert!(state.take_view_reset());
    }
}
