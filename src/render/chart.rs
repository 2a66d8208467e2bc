use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;

use super::geometry::{best_legend_loc, clip_segment, dash_polyline, legend_box, Point, Rect};
use super::text::{display_label, wrap};
use super::ticks::{axis_ticks, format_tick, tick_decimals};
use super::{drawing_err, PlotError};
use crate::color::{parse_color, Rgb8};
use crate::figure::Figure;
use crate::style::{LegendLoc, LineStyle, Marker, ResolvedStyle, TickDirection};

/// Dash pattern of reference lines, in multiples of their width.
const HLINE_DASHES: [f64; 2] = [3.7, 1.6];

fn rgb(c: Rgb8) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

fn stroke(width: f64) -> u32 {
    width.round().max(1.0) as u32
}

fn to_px(p: Point) -> (i32, i32) {
    (p.0.round() as i32, p.1.round() as i32)
}

/// Dash lengths scale with the line width.
fn scaled_dashes(dashes: [f64; 2], line_width: f64) -> [f64; 2] {
    [dashes[0] * line_width, dashes[1] * line_width]
}

// ---------------------------------------------------------------------------
// Primitives
// ---------------------------------------------------------------------------

/// Draw a (possibly dashed) polyline in backend pixels, clipped to `clip`.
fn draw_polyline<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    points: &[Point],
    dashes: Option<[f64; 2]>,
    clip: &Rect,
    style: ShapeStyle,
) -> Result<(), PlotError> {
    let pieces = match dashes {
        Some(pattern) => dash_polyline(points, pattern),
        None if points.len() >= 2 => vec![points.to_vec()],
        None => Vec::new(),
    };
    for piece in pieces {
        for pair in piece.windows(2) {
            if let Some((a, b)) = clip_segment(pair[0], pair[1], clip) {
                root.draw(&PathElement::new(vec![to_px(a), to_px(b)], style))
                    .map_err(drawing_err)?;
            }
        }
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    center: Point,
    style: &ResolvedStyle,
    scale: f64,
) -> Result<(), PlotError> {
    let r = style.marker_size * scale / 2.0;
    let (cx, cy) = center;
    let fill = rgb(style.color).filled();
    let edge_width = style.marker_edge_width * scale;
    let edge = rgb(style.marker_edge_color).stroke_width(stroke(edge_width));

    let outline: Vec<Point> = match style.marker {
        Marker::None => return Ok(()),
        Marker::Circle => {
            let c = to_px(center);
            let radius = r.round().max(1.0) as i32;
            root.draw(&Circle::new(c, radius, fill)).map_err(drawing_err)?;
            if edge_width > 0.0 {
                root.draw(&Circle::new(c, radius, edge)).map_err(drawing_err)?;
            }
            return Ok(());
        }
        Marker::Square => {
            let h = r * 0.9;
            vec![(cx - h, cy - h), (cx + h, cy - h), (cx + h, cy + h), (cx - h, cy + h)]
        }
        Marker::TriangleUp => vec![(cx, cy - r), (cx + r, cy + r * 0.75), (cx - r, cy + r * 0.75)],
        Marker::TriangleDown => vec![(cx, cy + r), (cx - r, cy - r * 0.75), (cx + r, cy - r * 0.75)],
        Marker::Diamond => vec![(cx, cy - r), (cx + r * 0.75, cy), (cx, cy + r), (cx - r * 0.75, cy)],
    };

    let mut corners: Vec<(i32, i32)> = outline.into_iter().map(to_px).collect();
    root.draw(&Polygon::new(corners.clone(), fill))
        .map_err(drawing_err)?;
    if edge_width > 0.0 {
        corners.push(corners[0]);
        root.draw(&PathElement::new(corners, edge))
            .map_err(drawing_err)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tick labels
// ---------------------------------------------------------------------------

/// Tick positions with their printed labels, per axis.
#[derive(Debug, Clone, PartialEq)]
pub struct TickLabels {
    pub x: Vec<(f64, String)>,
    pub y: Vec<(f64, String)>,
}

/// Ticks for a plot area of `area` pixels. Without a configured spacing
/// the tick count follows the room available at `font_px`.
pub fn tick_labels(figure: &Figure, area: (u32, u32), font_px: f64) -> TickLabels {
    let config = &figure.config;
    let (x0, x1) = figure.x_range();
    let (y0, y1) = figure.y_range();
    let font_px = font_px.max(1.0);

    let x_target = (area.0 as f64 / (font_px * 4.0)).round().clamp(3.0, 9.0) as usize;
    let y_target = (area.1 as f64 / (font_px * 2.5)).round().clamp(3.0, 9.0) as usize;

    let label = |ticks: Vec<f64>| -> Vec<(f64, String)> {
        let decimals = tick_decimals(&ticks);
        ticks
            .into_iter()
            .map(|v| (v, format_tick(v, decimals)))
            .collect()
    };
    TickLabels {
        x: label(axis_ticks(x0, x1, config.x_tick_spacing, x_target)),
        y: label(axis_ticks(y0, y1, config.y_tick_spacing, y_target)),
    }
}

// ---------------------------------------------------------------------------
// Figure
// ---------------------------------------------------------------------------

/// Draw `figure` onto `root`. `scale` converts points to backend pixels.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    scale: f64,
) -> Result<(), PlotError> {
    let config = &figure.config;
    let theme = &config.theme;
    let pt = |v: f64| v * scale;
    let family = theme.font_family.as_str();

    root.fill(&WHITE).map_err(drawing_err)?;

    // ---- Title ----
    let title_size = pt(config.title_font_size.unwrap_or(theme.font_size));
    let title_lines = config
        .title
        .as_deref()
        .map(|t| wrap(&display_label(t, theme.usetex), config.title_wrap))
        .unwrap_or_default();
    let line_height = title_size * 1.2;
    let title_height = if title_lines.is_empty() {
        pt(8.0)
    } else {
        title_lines.len() as f64 * line_height + pt(10.0)
    };

    let (width, _) = root.dim_in_pixel();
    let title_style = TextStyle::from((family, title_size).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Top));
    for (i, line) in title_lines.iter().enumerate() {
        let y = pt(6.0) + i as f64 * line_height;
        root.draw(&Text::new(
            line.as_str(),
            ((width / 2) as i32, y.round() as i32),
            title_style.clone(),
        ))
        .map_err(drawing_err)?;
    }
    let (_, plot_area) = root.split_vertically(title_height.round() as i32);

    // ---- Axes ----
    let (x0, x1) = figure.x_range();
    let (y0, y1) = figure.y_range();
    let (area_w, area_h) = plot_area.dim_in_pixel();
    let font_px = pt(theme.font_size);
    let ticks = tick_labels(figure, (area_w, area_h), font_px);

    let label_style = TextStyle::from((family, font_px).into_font()).color(&BLACK);
    let mut widest_y_label = 0u32;
    for (_, text) in &ticks.y {
        let (w, _) = root
            .estimate_text_size(text, &label_style)
            .map_err(drawing_err)?;
        widest_y_label = widest_y_label.max(w);
    }
    let tick_len = pt(theme.ticks.length);
    let outward = match theme.ticks.direction {
        TickDirection::In => 0.0,
        TickDirection::Out => tick_len,
    };
    let label_gap = pt(theme.ticks.pad) + outward;
    let y_area = widest_y_label as f64 + label_gap + font_px * 1.6;
    let x_area = font_px * 1.2 + label_gap + font_px * 1.6;

    let chart = ChartBuilder::on(&plot_area)
        .margin_right(pt(16.0).round() as i32)
        .margin_top(pt(4.0).round() as i32)
        .x_label_area_size(x_area.round() as i32)
        .y_label_area_size(y_area.round() as i32)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    let (xr, yr) = chart.plotting_area().get_pixel_range();
    let rect = Rect {
        left: xr.start as f64,
        top: yr.start as f64,
        right: (xr.end - 1) as f64,
        bottom: (yr.end - 1) as f64,
    };
    let map = |x: f64, y: f64| -> Point {
        let (px, py) = chart.backend_coord(&(x, y));
        (px as f64, py as f64)
    };
    let x_px: Vec<(f64, &str)> = ticks
        .x
        .iter()
        .map(|(v, text)| (map(*v, y0).0, text.as_str()))
        .filter(|&(px, _)| px >= rect.left && px <= rect.right)
        .collect();
    let y_px: Vec<(f64, &str)> = ticks
        .y
        .iter()
        .map(|(v, text)| (map(x0, *v).1, text.as_str()))
        .filter(|&(py, _)| py >= rect.top && py <= rect.bottom)
        .collect();

    // ---- Grid ----
    if let Some(alpha) = config.grid_alpha {
        let grid = BLACK.mix(alpha).stroke_width(stroke(pt(0.8)));
        for &(px, _) in &x_px {
            draw_polyline(root, &[(px, rect.top), (px, rect.bottom)], None, &rect, grid)?;
        }
        for &(py, _) in &y_px {
            draw_polyline(root, &[(rect.left, py), (rect.right, py)], None, &rect, grid)?;
        }
    }

    // ---- Reference lines ----
    for hline in &config.hlines {
        let color = parse_color(&hline.color).map_err(|e| PlotError::ChartConfig(e.to_string()))?;
        let width = pt(hline.line_width);
        let style = rgb(color).mix(hline.alpha).stroke_width(stroke(width));
        let (_, py) = map(x0, hline.y);
        let dashes = hline.dashed.then(|| scaled_dashes(HLINE_DASHES, width));
        draw_polyline(root, &[(rect.left, py), (rect.right, py)], dashes, &rect, style)?;
    }

    // ---- Series ----
    let mut occupied: Vec<Point> = Vec::new();
    for series in &figure.series {
        let style = &series.style;
        let lw = pt(style.line_width);

        let error_style = rgb(style.ecolor).stroke_width(stroke(lw));
        for (x, y, e) in series.data.points() {
            if e > 0.0 && x.is_finite() && y.is_finite() {
                let (lo, hi) = (map(x, y - e), map(x, y + e));
                draw_polyline(root, &[lo, hi], None, &rect, error_style)?;
                occupied.extend([lo, hi]);
            }
        }

        let centers: Vec<Point> = series
            .data
            .points()
            .filter(|(x, y, _)| x.is_finite() && y.is_finite())
            .map(|(x, y, _)| map(x, y))
            .collect();

        let line_style = rgb(style.color).stroke_width(stroke(lw));
        match &style.line_style {
            LineStyle::None => {}
            LineStyle::Solid => draw_polyline(root, &centers, None, &rect, line_style)?,
            LineStyle::Dashed { dashes } => draw_polyline(
                root,
                &centers,
                Some(scaled_dashes(*dashes, lw)),
                &rect,
                line_style,
            )?,
        }

        for &c in centers.iter().filter(|&&c| rect.contains(c)) {
            draw_marker(root, c, style, scale)?;
        }
        occupied.extend(centers);
    }

    // ---- Frame and ticks ----
    let frame = BLACK.stroke_width(stroke(pt(theme.axes_line_width)));
    root.draw(&Rectangle::new(
        [to_px((rect.left, rect.top)), to_px((rect.right, rect.bottom))],
        frame,
    ))
    .map_err(drawing_err)?;

    let inward = match theme.ticks.direction {
        TickDirection::In => -tick_len,
        TickDirection::Out => tick_len,
    };
    let tick_style = BLACK.stroke_width(stroke(pt(theme.ticks.width)));
    let x_label_style = label_style.pos(Pos::new(HPos::Center, VPos::Top));
    for &(px, text) in &x_px {
        root.draw(&PathElement::new(
            vec![to_px((px, rect.bottom)), to_px((px, rect.bottom + inward))],
            tick_style,
        ))
        .map_err(drawing_err)?;
        root.draw(&Text::new(
            text,
            to_px((px, rect.bottom + label_gap)),
            x_label_style.clone(),
        ))
        .map_err(drawing_err)?;
    }
    let y_label_style = label_style.pos(Pos::new(HPos::Right, VPos::Center));
    for &(py, text) in &y_px {
        root.draw(&PathElement::new(
            vec![to_px((rect.left, py)), to_px((rect.left - inward, py))],
            tick_style,
        ))
        .map_err(drawing_err)?;
        root.draw(&Text::new(
            text,
            to_px((rect.left - label_gap, py)),
            y_label_style.clone(),
        ))
        .map_err(drawing_err)?;
    }

    // ---- Axis descriptions ----
    let x_desc = display_label(&config.x_label, theme.usetex);
    if !x_desc.is_empty() {
        let x = (rect.left + rect.right) / 2.0;
        let y = rect.bottom + label_gap + font_px * 1.4;
        root.draw(&Text::new(x_desc.as_str(), to_px((x, y)), x_label_style.clone()))
            .map_err(drawing_err)?;
    }
    let y_desc = display_label(&config.y_label, theme.usetex);
    if !y_desc.is_empty() {
        let x = rect.left - label_gap - widest_y_label as f64 - font_px * 0.9;
        let y = (rect.top + rect.bottom) / 2.0;
        let style = label_style
            .transform(FontTransform::Rotate270)
            .pos(Pos::new(HPos::Center, VPos::Center));
        root.draw(&Text::new(y_desc.as_str(), to_px((x, y)), style))
            .map_err(drawing_err)?;
    }

    draw_legend(root, figure, &rect, &occupied, scale)
}

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

fn draw_legend<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    figure: &Figure,
    plot: &Rect,
    occupied: &[Point],
    scale: f64,
) -> Result<(), PlotError> {
    let theme = &figure.config.theme;
    let legend = &theme.legend;

    // Labels starting with '_' are hidden, as are empty ones.
    let entries: Vec<(&ResolvedStyle, String)> = figure
        .series
        .iter()
        .filter(|s| !s.style.label.is_empty() && !s.style.label.starts_with('_'))
        .map(|s| (&s.style, display_label(&s.style.label, theme.usetex)))
        .collect();
    if entries.is_empty() {
        return Ok(());
    }

    let font_px = legend.font_size * scale;
    let font = TextStyle::from((theme.font_family.as_str(), font_px).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Left, VPos::Center));
    let mut text_w = 0.0f64;
    for (_, label) in &entries {
        let (w, _) = root.estimate_text_size(label, &font).map_err(drawing_err)?;
        text_w = text_w.max(w as f64);
    }

    let columns = legend.columns.clamp(1, entries.len());
    let rows = entries.len().div_ceil(columns);
    let row_h = font_px * (1.0 + legend.label_spacing);
    let handle_w = legend.handle_length * font_px;
    let text_pad = legend.handle_text_pad * font_px;
    let col_gap = 2.0 * font_px;
    let col_w = handle_w + text_pad + text_w;
    let border = 0.4 * font_px;
    let size = (
        columns as f64 * col_w + (columns - 1) as f64 * col_gap + 2.0 * border,
        rows as f64 * row_h + 2.0 * border,
    );
    let axes_pad = 0.5 * font_px;

    let loc = match legend.loc {
        LegendLoc::Best => best_legend_loc(plot, size, axes_pad, occupied),
        fixed => fixed,
    };
    let area = legend_box(loc, plot, size, axes_pad);
    log::debug!("legend placed at {loc:?}");

    if legend.frame_on {
        let corners = [to_px((area.left, area.top)), to_px((area.right, area.bottom))];
        root.draw(&Rectangle::new(corners, WHITE.mix(0.8).filled()))
            .map_err(drawing_err)?;
        root.draw(&Rectangle::new(corners, RGBColor(204, 204, 204).stroke_width(1)))
            .map_err(drawing_err)?;
    }

    for (i, (style, label)) in entries.iter().enumerate() {
        let (col, row) = (i / rows, i % rows);
        let x = area.left + border + col as f64 * (col_w + col_gap);
        let cy = area.top + border + (row as f64 + 0.5) * row_h;
        let lw = style.line_width * scale;
        let handle = [(x, cy), (x + handle_w, cy)];

        let line_style = rgb(style.color).stroke_width(stroke(lw));
        match &style.line_style {
            LineStyle::None => {}
            LineStyle::Solid => draw_polyline(root, &handle, None, &area, line_style)?,
            LineStyle::Dashed { dashes } => draw_polyline(
                root,
                &handle,
                Some(scaled_dashes(*dashes, lw)),
                &area,
                line_style,
            )?,
        }

        let mid = (x + handle_w / 2.0, cy);
        let half_bar = 0.35 * font_px;
        draw_polyline(
            root,
            &[(mid.0, cy - half_bar), (mid.0, cy + half_bar)],
            None,
            &area,
            rgb(style.ecolor).stroke_width(stroke(lw)),
        )?;
        draw_marker(root, mid, style, scale)?;

        root.draw(&Text::new(
            label.as_str(),
            to_px((x + handle_w + text_pad, cy)),
            font.clone(),
        ))
        .map_err(drawing_err)?;
    }
    Ok(())
}
