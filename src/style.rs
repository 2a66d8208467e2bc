use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{parse_color, ColorError, Rgb8};

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("unknown series style '{name}' (known: {known})")]
    UnknownPreset { name: String, known: String },

    #[error(transparent)]
    Color(#[from] ColorError),
}

// ---------------------------------------------------------------------------
// Theme – figure-wide settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TickDirection {
    #[default]
    In,
    Out,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TickStyle {
    pub direction: TickDirection,
    /// Major tick length in points.
    pub length: f64,
    pub width: f64,
    /// Gap between tick and label in points.
    pub pad: f64,
}

impl Default for TickStyle {
    fn default() -> Self {
        Self {
            direction: TickDirection::In,
            length: 8.0,
            width: 2.0,
            pad: 10.0,
        }
    }
}

/// Legend anchor. `Best` picks the corner that hides the fewest points.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LegendLoc {
    #[default]
    Best,
    #[serde(alias = "upper right")]
    UpperRight,
    #[serde(alias = "upper left")]
    UpperLeft,
    #[serde(alias = "lower left")]
    LowerLeft,
    #[serde(alias = "lower right")]
    LowerRight,
    Right,
    #[serde(alias = "center left")]
    CenterLeft,
    #[serde(alias = "center right")]
    CenterRight,
    #[serde(alias = "lower center")]
    LowerCenter,
    #[serde(alias = "upper center")]
    UpperCenter,
    Center,
}

impl LegendLoc {
    /// Candidate order used when resolving `Best`; earlier wins ties.
    pub const CANDIDATES: [LegendLoc; 10] = [
        LegendLoc::UpperRight,
        LegendLoc::UpperLeft,
        LegendLoc::LowerLeft,
        LegendLoc::LowerRight,
        LegendLoc::Right,
        LegendLoc::CenterLeft,
        LegendLoc::CenterRight,
        LegendLoc::LowerCenter,
        LegendLoc::UpperCenter,
        LegendLoc::Center,
    ];
}

/// Legend layout. Lengths are in units of the legend font size.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LegendStyle {
    pub frame_on: bool,
    pub font_size: f64,
    pub handle_length: f64,
    pub label_spacing: f64,
    pub handle_text_pad: f64,
    pub loc: LegendLoc,
    pub columns: usize,
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            frame_on: false,
            font_size: 17.0,
            handle_length: 2.3,
            label_spacing: 0.4,
            handle_text_pad: 0.4,
            loc: LegendLoc::Best,
            columns: 1,
        }
    }
}

/// Figure-wide defaults for fonts, lines, axes, ticks and legend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    /// Points.
    pub font_size: f64,
    pub line_width: f64,
    /// Width of the axes frame.
    pub axes_line_width: f64,
    pub ticks: TickStyle,
    pub legend: LegendStyle,
    /// Width and height in inches.
    pub figure_size: [f64; 2],
    /// Raster resolution; vector output is always 72 units per inch.
    pub dpi: f64,
    /// Render `$...$` markup in labels.
    pub usetex: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "serif".to_string(),
            font_size: 18.0,
            line_width: 2.0,
            axes_line_width: 2.0,
            ticks: TickStyle::default(),
            legend: LegendStyle::default(),
            figure_size: [7.04, 5.28],
            dpi: 100.0,
            usetex: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Series styles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Marker {
    Square,
    #[default]
    Circle,
    TriangleUp,
    TriangleDown,
    Diamond,
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum LineStyle {
    Solid,
    /// On/off lengths in points.
    Dashed { dashes: [f64; 2] },
    None,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle::Solid
    }
}

/// Per-series appearance as written in a figure file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesStyle {
    pub label: String,
    #[serde(default)]
    pub color: Option<String>,
    /// Error bar colour; defaults to `color`.
    #[serde(default)]
    pub ecolor: Option<String>,
    #[serde(default)]
    pub line_style: LineStyle,
    #[serde(default)]
    pub marker: Marker,
    /// Marker diameter in points.
    #[serde(default = "SeriesStyle::default_marker_size")]
    pub marker_size: f64,
    #[serde(default)]
    pub marker_edge_color: Option<String>,
    #[serde(default = "SeriesStyle::default_marker_edge_width")]
    pub marker_edge_width: f64,
    /// Overrides `Theme::line_width`.
    #[serde(default)]
    pub line_width: Option<f64>,
}

/// A style with every colour decided.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub label: String,
    pub color: Rgb8,
    pub ecolor: Rgb8,
    pub line_style: LineStyle,
    pub marker: Marker,
    pub marker_size: f64,
    pub marker_edge_color: Rgb8,
    pub marker_edge_width: f64,
    pub line_width: f64,
}

impl SeriesStyle {
    fn default_marker_size() -> f64 {
        6.0
    }

    fn default_marker_edge_width() -> f64 {
        1.0
    }

    /// Decide colours. `fallback` is used when the style names none.
    pub fn resolve(&self, fallback: Rgb8, theme: &Theme) -> Result<ResolvedStyle, ColorError> {
        let color = match &self.color {
            Some(c) => parse_color(c)?,
            None => fallback,
        };
        let ecolor = match &self.ecolor {
            Some(c) => parse_color(c)?,
            None => color,
        };
        let marker_edge_color = match &self.marker_edge_color {
            Some(c) => parse_color(c)?,
            None => color,
        };
        Ok(ResolvedStyle {
            label: self.label.clone(),
            color,
            ecolor,
            line_style: self.line_style.clone(),
            marker: self.marker,
            marker_size: self.marker_size,
            marker_edge_color,
            marker_edge_width: self.marker_edge_width,
            line_width: self.line_width.unwrap_or(theme.line_width),
        })
    }
}

// ---------------------------------------------------------------------------
// Named styles
// ---------------------------------------------------------------------------

pub const PRESET_NAMES: [&str; 5] = [
    "2eSRnoTmoves",
    "2eSRTmoves",
    "2eCASnoTmoves",
    "2enoTmoves",
    "2eTmoves",
];

fn dashed(label: &str, color: &str, marker: Marker, marker_size: f64, dashes: [f64; 2]) -> SeriesStyle {
    SeriesStyle {
        label: label.to_string(),
        color: Some(color.to_string()),
        ecolor: Some(color.to_string()),
        line_style: LineStyle::Dashed { dashes },
        marker,
        marker_size,
        marker_edge_color: Some("#000000".to_string()),
        marker_edge_width: 0.5,
        line_width: None,
    }
}

/// Look up one of the built-in series styles.
pub fn preset(name: &str) -> Result<SeriesStyle, StyleError> {
    let style = match name {
        "2eSRnoTmoves" => dashed(
            "2e$^-$ ccECP single-ref no T-moves",
            "g",
            Marker::Square,
            5.0,
            [3.0, 1.0],
        ),
        "2eSRTmoves" => dashed(
            "2e$^-$ ccECP single-ref T-moves",
            "tab:orange",
            Marker::Circle,
            5.0,
            [3.0, 1.0],
        ),
        "2eCASnoTmoves" => dashed(
            "2e$^-$ ccECP CAS no T-moves",
            "b",
            Marker::TriangleUp,
            5.0,
            [3.0, 1.0],
        ),
        "2enoTmoves" => dashed("2e- ccECP no Tmoves", "#ff9933", Marker::Square, 6.0, [3.0, 1.0]),
        "2eTmoves" => dashed("2e- ccECP Tmoves", "#009933", Marker::Circle, 6.0, [6.0, 1.0]),
        _ => {
            return Err(StyleError::UnknownPreset {
                name: name.to_string(),
                known: PRESET_NAMES.join(", "),
            })
        }
    };
    Ok(style)
}

#[cfg(test)]
mod tests {
    use super::*;
    use palette::Srgb;

    #[test]
    fn every_preset_resolves() {
        let theme = Theme::default();
        for name in PRESET_NAMES {
            let style = preset(name).unwrap();
            let resolved = style.resolve(Srgb::new(1, 2, 3), &theme).unwrap();
            assert_eq!(resolved.marker_edge_color, Srgb::new(0, 0, 0));
            assert_eq!(resolved.line_width, theme.line_width);
        }
    }

    #[test]
    fn unknown_preset_lists_known_names() {
        let err = preset("3eTmoves").unwrap_err();
        assert!(err.to_string().contains("2eSRTmoves"));
    }

    #[test]
    fn missing_colours_fall_back() {
        let style: SeriesStyle = serde_json::from_str(r#"{"label": "run A"}"#).unwrap();
        assert_eq!(style.marker, Marker::Circle);
        assert_eq!(style.line_style, LineStyle::Solid);

        let fallback = Srgb::new(10, 20, 30);
        let resolved = style.resolve(fallback, &Theme::default()).unwrap();
        assert_eq!(resolved.color, fallback);
        assert_eq!(resolved.ecolor, fallback);
        assert_eq!(resolved.marker_edge_color, fallback);
    }

    #[test]
    fn theme_fields_default_individually() {
        let theme: Theme =
            serde_json::from_str(r#"{"font_size": 20.0, "legend": {"loc": "upper left"}}"#).unwrap();
        assert_eq!(theme.font_size, 20.0);
        assert_eq!(theme.legend.loc, LegendLoc::UpperLeft);
        assert_eq!(theme.legend.font_size, 17.0);
        assert_eq!(theme.figure_size, [7.04, 5.28]);
    }

    #[test]
    fn dashed_line_style_round_trips_through_json() {
        let style = preset("2eTmoves").unwrap();
        let json = serde_json::to_string(&style).unwrap();
        assert!(json.contains(r#""dashed":{"dashes":[6.0,1.0]}"#));
        let back: SeriesStyle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, style);
    }
}
