//! Axis ranges, tick positions and tick labels.

/// Fraction of the data span added on each side when autoscaling.
pub const AUTO_MARGIN: f64 = 0.05;

/// Tick counts above this are treated as a configuration mistake.
const MAX_TICKS: i64 = 1000;

/// Displayed interval for one axis: explicit limits win, otherwise the data
/// bounds are widened by [`AUTO_MARGIN`].
pub fn axis_range(limits: Option<[f64; 2]>, bounds: Option<(f64, f64)>) -> (f64, f64) {
    if let Some([lo, hi]) = limits {
        return (lo, hi);
    }
    match bounds {
        None => (0.0, 1.0),
        Some((lo, hi)) if lo == hi => {
            let pad = if lo == 0.0 { 0.5 } else { lo.abs() * AUTO_MARGIN };
            (lo - pad, hi + pad)
        }
        Some((lo, hi)) => {
            let pad = (hi - lo) * AUTO_MARGIN;
            (lo - pad, hi + pad)
        }
    }
}

/// Multiples of `step` inside `[lo, hi]`.
///
/// Returns nothing when the spacing exceeds the range, like a multiple
/// locator on a narrow axis.
pub fn multiples(lo: f64, hi: f64, step: f64) -> Vec<f64> {
    if !(step > 0.0) || !lo.is_finite() || !hi.is_finite() || hi < lo {
        return Vec::new();
    }
    let eps = 1e-9;
    let first = (lo / step - eps).ceil() as i64;
    let last = (hi / step + eps).floor() as i64;
    if last < first || last - first > MAX_TICKS {
        return Vec::new();
    }
    (first..=last).map(|k| k as f64 * step).collect()
}

/// Step from the 1, 2, 2.5, 5 × 10ⁿ family that gives about `target` ticks.
pub fn nice_step(lo: f64, hi: f64, target: usize) -> Option<f64> {
    let span = hi - lo;
    if !(span > 0.0) || !span.is_finite() {
        return None;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10f64.powf(raw.log10().floor());
    [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&step| step >= raw * (1.0 - 1e-9))
}

/// Ticks for an axis: at `spacing` if configured, else at a nice step.
pub fn axis_ticks(lo: f64, hi: f64, spacing: Option<f64>, target: usize) -> Vec<f64> {
    let step = match spacing {
        Some(s) => Some(s),
        None => nice_step(lo, hi, target),
    };
    step.map(|s| multiples(lo, hi, s)).unwrap_or_default()
}

/// Number of decimals needed to print multiples of `step` exactly.
pub fn step_decimals(step: f64) -> usize {
    if !(step > 0.0) || !step.is_finite() {
        return 0;
    }
    (0..=12)
        .find(|&d| {
            let scaled = step * 10f64.powi(d as i32);
            (scaled - scaled.round()).abs() < 1e-6 * scaled.max(1.0)
        })
        .unwrap_or(12)
}

/// Decimals for a tick list: driven by the spacing between neighbours.
pub fn tick_decimals(ticks: &[f64]) -> usize {
    match ticks {
        [a, b, ..] => step_decimals((b - a).abs()),
        [single] => step_decimals(single.abs()).min(6),
        [] => 0,
    }
}

pub fn format_tick(value: f64, decimals: usize) -> String {
    // `+ 0.0` turns -0.0 into 0.0
    format!("{:.decimals$}", value + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_limits_win() {
        assert_eq!(axis_range(Some([-2.26, -2.24]), Some((-5.0, 5.0))), (-2.26, -2.24));
    }

    #[test]
    fn autoscale_adds_margins() {
        assert_eq!(axis_range(None, Some((0.0, 10.0))), (-0.5, 10.5));
        assert_eq!(axis_range(None, Some((0.0, 0.0))), (-0.5, 0.5));
        assert_eq!(axis_range(None, None), (0.0, 1.0));
    }

    #[test]
    fn spacing_wider_than_range_gives_no_ticks() {
        assert!(multiples(-2.26, -2.24, 1.0).is_empty());
        assert_eq!(multiples(-1.0, 2.5, 1.0), vec![-1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn nice_steps() {
        assert_eq!(nice_step(0.0, 10.0, 8), Some(2.0));
        assert_eq!(nice_step(0.0, 1.0, 5), Some(0.2));
        assert_eq!(nice_step(0.0, 1.0, 4), Some(0.25));
        assert_eq!(nice_step(1.0, 1.0, 4), None);

        let ticks = axis_ticks(0.0, 10.0, None, 8);
        assert_eq!(ticks, vec![0.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn decimals_follow_the_step() {
        assert_eq!(step_decimals(2.0), 0);
        assert_eq!(step_decimals(0.25), 2);
        assert_eq!(step_decimals(0.005), 3);
        assert_eq!(tick_decimals(&[-2.26, -2.255, -2.25]), 3);
        assert_eq!(format_tick(-0.0, 2), "0.00");
        assert_eq!(format_tick(-2.2549999, 3), "-2.255");
    }
}
