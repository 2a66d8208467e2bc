//! Pixel-space helpers used by the chart renderer.
//!
//! All coordinates are backend pixels with y growing downwards.

use crate::style::LegendLoc;

pub type Point = (f64, f64);

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    pub fn contains(&self, (x, y): Point) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}

// ---------------------------------------------------------------------------
// Dashes
// ---------------------------------------------------------------------------

/// Split a polyline into the "on" pieces of an `[on, off]` dash pattern.
///
/// The pattern phase carries over from one segment to the next. A
/// pattern without a positive `on` length yields the polyline unchanged.
pub fn dash_polyline(points: &[Point], pattern: [f64; 2]) -> Vec<Vec<Point>> {
    let [on, off] = pattern;
    if points.len() < 2 {
        return Vec::new();
    }
    if !(on > 0.0) || !(off > 0.0) {
        return vec![points.to_vec()];
    }

    let mut dashes = Vec::new();
    let mut current: Vec<Point> = vec![points[0]];
    let mut drawing = true;
    // Length left in the current on/off phase.
    let mut remaining = on;

    for pair in points.windows(2) {
        let (a, b) = (pair[0], pair[1]);
        let len = ((b.0 - a.0).powi(2) + (b.1 - a.1).powi(2)).sqrt();
        if len == 0.0 {
            continue;
        }
        let mut travelled = 0.0;
        while len - travelled > remaining {
            travelled += remaining;
            let t = travelled / len;
            let p = (a.0 + (b.0 - a.0) * t, a.1 + (b.1 - a.1) * t);
            if drawing {
                current.push(p);
                dashes.push(std::mem::take(&mut current));
                remaining = off;
            } else {
                current.push(p);
                remaining = on;
            }
            drawing = !drawing;
        }
        remaining -= len - travelled;
        if drawing {
            current.push(b);
        } else {
            current.clear();
        }
    }

    if drawing && current.len() >= 2 {
        dashes.push(current);
    }
    dashes
}

// ---------------------------------------------------------------------------
// Clipping
// ---------------------------------------------------------------------------

/// Clip the segment `a`–`b` to `rect` (Liang–Barsky).
pub fn clip_segment(a: Point, b: Point, rect: &Rect) -> Option<(Point, Point)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let mut t0: f64 = 0.0;
    let mut t1: f64 = 1.0;

    let checks = [
        (-dx, a.0 - rect.left),
        (dx, rect.right - a.0),
        (-dy, a.1 - rect.top),
        (dy, rect.bottom - a.1),
    ];
    for (p, q) in checks {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

// ---------------------------------------------------------------------------
// Legend placement
// ---------------------------------------------------------------------------

/// Where a legend box of `size` sits inside `plot` for a fixed location.
/// `pad` is the gap to the axes frame.
pub fn legend_box(loc: LegendLoc, plot: &Rect, size: (f64, f64), pad: f64) -> Rect {
    let (w, h) = size;
    let left = plot.left + pad;
    let right = plot.right - pad - w;
    let hcenter = plot.left + (plot.width() - w) / 2.0;
    let top = plot.top + pad;
    let bottom = plot.bottom - pad - h;
    let vcenter = plot.top + (plot.height() - h) / 2.0;

    let (x, y) = match loc {
        LegendLoc::Best | LegendLoc::UpperRight => (right, top),
        LegendLoc::UpperLeft => (left, top),
        LegendLoc::LowerLeft => (left, bottom),
        LegendLoc::LowerRight => (right, bottom),
        LegendLoc::Right | LegendLoc::CenterRight => (right, vcenter),
        LegendLoc::CenterLeft => (left, vcenter),
        LegendLoc::LowerCenter => (hcenter, bottom),
        LegendLoc::UpperCenter => (hcenter, top),
        LegendLoc::Center => (hcenter, vcenter),
    };
    Rect {
        left: x,
        top: y,
        right: x + w,
        bottom: y + h,
    }
}

/// Pick the candidate location whose box covers the fewest `points`.
/// Ties go to the earlier candidate.
pub fn best_legend_loc(plot: &Rect, size: (f64, f64), pad: f64, points: &[Point]) -> LegendLoc {
    let mut best = LegendLoc::UpperRight;
    let mut best_count = usize::MAX;
    for loc in LegendLoc::CANDIDATES {
        let area = legend_box(loc, plot, size, pad);
        let count = points.iter().filter(|&&p| area.contains(p)).count();
        if count < best_count {
            best = loc;
            best_count = count;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLOT: Rect = Rect {
        left: 0.0,
        top: 0.0,
        right: 100.0,
        bottom: 100.0,
    };

    #[test]
    fn dashes_follow_the_pattern_across_vertices() {
        let line = [(0.0, 0.0), (5.0, 0.0), (10.0, 0.0)];
        let dashes = dash_polyline(&line, [3.0, 1.0]);
        // on 0-3, off 3-4, on 4-7, off 7-8, on 8-10
        assert_eq!(dashes.len(), 3);
        assert_eq!(dashes[0], vec![(0.0, 0.0), (3.0, 0.0)]);
        assert_eq!(dashes[1], vec![(4.0, 0.0), (5.0, 0.0), (7.0, 0.0)]);
        assert_eq!(dashes[2], vec![(8.0, 0.0), (10.0, 0.0)]);
    }

    #[test]
    fn solid_pattern_keeps_polyline() {
        let line = [(0.0, 0.0), (1.0, 1.0)];
        assert_eq!(dash_polyline(&line, [0.0, 0.0]), vec![line.to_vec()]);
        assert!(dash_polyline(&line[..1], [3.0, 1.0]).is_empty());
    }

    #[test]
    fn clips_segments_to_rect() {
        let clipped = clip_segment((-50.0, 50.0), (150.0, 50.0), &PLOT).unwrap();
        assert_eq!(clipped, ((0.0, 50.0), (100.0, 50.0)));

        assert_eq!(
            clip_segment((10.0, 10.0), (20.0, 20.0), &PLOT),
            Some(((10.0, 10.0), (20.0, 20.0)))
        );
        assert_eq!(clip_segment((-10.0, -10.0), (-5.0, 200.0), &PLOT), None);
        assert_eq!(clip_segment((50.0, 120.0), (50.0, 130.0), &PLOT), None);
    }

    #[test]
    fn legend_boxes_hug_the_requested_corner() {
        let r = legend_box(LegendLoc::LowerLeft, &PLOT, (20.0, 10.0), 5.0);
        assert_eq!(r, Rect { left: 5.0, top: 85.0, right: 25.0, bottom: 95.0 });

        let r = legend_box(LegendLoc::UpperRight, &PLOT, (20.0, 10.0), 5.0);
        assert_eq!(r, Rect { left: 75.0, top: 5.0, right: 95.0, bottom: 15.0 });
    }

    #[test]
    fn best_location_avoids_data() {
        // Data crowds the upper right and upper left corners.
        let points = [(90.0, 10.0), (85.0, 12.0), (10.0, 10.0)];
        let loc = best_legend_loc(&PLOT, (20.0, 10.0), 5.0, &points);
        assert_eq!(loc, LegendLoc::LowerLeft);

        // Nothing to avoid: first candidate wins.
        assert_eq!(best_legend_loc(&PLOT, (20.0, 10.0), 5.0, &[]), LegendLoc::UpperRight);
    }
}
