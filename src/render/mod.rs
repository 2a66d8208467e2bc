//! Static figure rendering with `plotters`.
//!
//! ```text
//!   Figure ──► chart::draw_figure ──► SVG string ──► svg2pdf ──► .pdf
//!                                 │               └────────────► .svg
//!                                 └─► RGB buffer ──────────────► .png
//! ```
//!
//! Sizes in a [`crate::style::Theme`] are in points. Vector backends use one
//! pixel per point; the bitmap backend scales by `dpi / 72`.

pub mod chart;
pub mod export;
pub mod geometry;
pub mod text;
pub mod ticks;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

pub use export::{render_svg, save_figure, OutputFormat};

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Failed to convert SVG to PDF: {0}")]
    Pdf(String),

    #[error("Unsupported output format '{0}' (expected pdf, svg or png)")]
    UnsupportedFormat(String),
}

pub(crate) fn drawing_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> PlotError {
    PlotError::Drawing(e.to_string())
}
