use std::fs;
use std::path::Path;

use plotters::prelude::*;

use super::chart::draw_figure;
use super::{drawing_err, PlotError};
use crate::figure::Figure;

/// Points per inch; vector output uses one unit per point.
const POINTS_PER_INCH: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Pdf,
    Svg,
    Png,
}

impl OutputFormat {
    /// Pick the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(OutputFormat::Pdf),
            "svg" => Ok(OutputFormat::Svg),
            "png" => Ok(OutputFormat::Png),
            _ => Err(PlotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Canvas size in points.
fn canvas_points(figure: &Figure) -> (u32, u32) {
    let [w, h] = figure.config.theme.figure_size;
    (
        (w * POINTS_PER_INCH).round().max(1.0) as u32,
        (h * POINTS_PER_INCH).round().max(1.0) as u32,
    )
}

/// Render `figure` to an SVG document.
pub fn render_svg(figure: &Figure) -> Result<String, PlotError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, canvas_points(figure)).into_drawing_area();
        draw_figure(&root, figure, 1.0)?;
        root.present().map_err(drawing_err)?;
    }
    Ok(svg)
}

/// Convert an SVG document into a single-page PDF.
pub fn svg_to_pdf(svg: &str) -> Result<Vec<u8>, PlotError> {
    let mut options = svg2pdf::usvg::Options::default();
    options.fontdb_mut().load_system_fonts();

    let tree = svg2pdf::usvg::Tree::from_str(svg, &options)
        .map_err(|e| PlotError::Pdf(e.to_string()))?;
    svg2pdf::to_pdf(
        &tree,
        svg2pdf::ConversionOptions::default(),
        svg2pdf::PageOptions::default(),
    )
    .map_err(|e| PlotError::Pdf(e.to_string()))
}

fn render_png(figure: &Figure, path: &Path) -> Result<(), PlotError> {
    let scale = figure.config.theme.dpi / POINTS_PER_INCH;
    let (w, h) = canvas_points(figure);
    let size = (
        (w as f64 * scale).round() as u32,
        (h as f64 * scale).round() as u32,
    );

    let root = BitMapBackend::new(path, size).into_drawing_area();
    draw_figure(&root, figure, scale)?;
    root.present().map_err(drawing_err)?;
    Ok(())
}

/// Save `figure` to `path`; the extension selects PDF, SVG or PNG.
/// Missing parent directories are created.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<(), PlotError> {
    let format = OutputFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    match format {
        OutputFormat::Svg => fs::write(path, render_svg(figure)?)?,
        OutputFormat::Pdf => fs::write(path, svg_to_pdf(&render_svg(figure)?)?)?,
        OutputFormat::Png => render_png(figure, path)?,
    }

    log::info!("Saved {:?} figure to {}", format, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FigurePreset;

    #[test]
    fn format_follows_extension() {
        assert_eq!(OutputFormat::from_path(Path::new("a.pdf")).unwrap(), OutputFormat::Pdf);
        assert_eq!(OutputFormat::from_path(Path::new("dir/a.SVG")).unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::from_path(Path::new("a.png")).unwrap(), OutputFormat::Png);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        for name in ["a.jpg", "noext"] {
            let err = OutputFormat::from_path(Path::new(name)).unwrap_err();
            assert!(matches!(err, PlotError::UnsupportedFormat(_)));
        }
    }

    #[test]
    fn unsupported_format_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let figure =
            Figure::from_config(FigurePreset::Timestep.config(), Path::new(".")).unwrap();
        let path = dir.path().join("nested").join("figure.eps");
        assert!(save_figure(&figure, &path).is_err());
        assert!(!dir.path().join("nested").exists());
    }

    #[test]
    fn canvas_is_measured_in_points() {
        let figure =
            Figure::from_config(FigurePreset::Timestep.config(), Path::new(".")).unwrap();
        assert_eq!(canvas_points(&figure), (507, 380));
    }

    #[test]
    fn timestep_figure_renders_in_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let figure =
            Figure::from_config(FigurePreset::Timestep.config(), Path::new(".")).unwrap();

        for name in ["figure.svg", "figure.pdf", "figure.png"] {
            let path = dir.path().join(name);
            save_figure(&figure, &path).unwrap();
            assert!(path.exists(), "{name} was not written");
            assert!(fs::metadata(&path).unwrap().len() > 0);
        }

        let svg = fs::read_to_string(dir.path().join("figure.svg")).unwrap();
        assert!(svg.contains("<svg"));
        let pdf = fs::read(dir.path().join("figure.pdf")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
        let png = fs::read(dir.path().join("figure.png")).unwrap();
        assert!(png.starts_with(b"\x89PNG"));
    }
}
