use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::parse_color;
use crate::style::{SeriesStyle, Theme};

// ---------------------------------------------------------------------------
// Series configuration
// ---------------------------------------------------------------------------

/// Where a series' numbers come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum DataSource {
    /// Columns of a CSV file; relative paths resolve against the data directory.
    Csv {
        csv: PathBuf,
        x: String,
        y: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        yerr: Option<String>,
    },
    /// Literal arrays. Missing `yerr` means no error bars.
    Inline {
        x: Vec<f64>,
        y: Vec<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        yerr: Option<Vec<f64>>,
    },
}

/// Either the name of a built-in style or a full inline style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum StyleSpec {
    Preset(String),
    Custom(SeriesStyle),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesConfig {
    pub source: DataSource,
    pub style: StyleSpec,
    /// Replaces the style's legend label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// A horizontal reference line across the axes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HLine {
    pub y: f64,
    #[serde(default = "HLine::default_color")]
    pub color: String,
    #[serde(default = "HLine::default_line_width")]
    pub line_width: f64,
    #[serde(default = "HLine::default_alpha")]
    pub alpha: f64,
    #[serde(default = "HLine::default_dashed")]
    pub dashed: bool,
}

impl HLine {
    fn default_color() -> String {
        "#ff0000".to_string()
    }
    fn default_line_width() -> f64 {
        1.0
    }
    fn default_alpha() -> f64 {
        1.0
    }
    fn default_dashed() -> bool {
        true
    }
}

// ---------------------------------------------------------------------------
// Figure configuration
// ---------------------------------------------------------------------------

/// Everything needed to draw and save one figure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FigureConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Title line width in characters.
    #[serde(default = "FigureConfig::default_title_wrap")]
    pub title_wrap: usize,
    /// Defaults to the theme font size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_font_size: Option<f64>,
    #[serde(default)]
    pub x_label: String,
    #[serde(default)]
    pub y_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_limits: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_limits: Option<[f64; 2]>,
    /// Place x ticks at multiples of this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_tick_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_tick_spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hlines: Vec<HLine>,
    /// Major grid opacity; no grid when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_alpha: Option<f64>,
    #[serde(default)]
    pub theme: Theme,
    pub output: PathBuf,
    pub series: Vec<SeriesConfig>,
}

impl FigureConfig {
    fn default_title_wrap() -> usize {
        70
    }

    /// Reject settings that cannot produce a figure.
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.series.is_empty(), "figure has no series");
        ensure!(self.title_wrap > 0, "title_wrap must be positive");
        for (name, limits) in [("x_limits", self.x_limits), ("y_limits", self.y_limits)] {
            if let Some([lo, hi]) = limits {
                ensure!(
                    lo.is_finite() && hi.is_finite() && lo < hi,
                    "{name} must be increasing finite values, got [{lo}, {hi}]"
                );
            }
        }
        for (name, spacing) in [
            ("x_tick_spacing", self.x_tick_spacing),
            ("y_tick_spacing", self.y_tick_spacing),
        ] {
            if let Some(s) = spacing {
                ensure!(s.is_finite() && s > 0.0, "{name} must be positive, got {s}");
            }
        }
        let [w, h] = self.theme.figure_size;
        ensure!(w > 0.0 && h > 0.0, "figure_size must be positive, got [{w}, {h}]");
        ensure!(self.theme.dpi > 0.0, "dpi must be positive");
        if let Some(alpha) = self.grid_alpha {
            ensure!((0.0..=1.0).contains(&alpha), "grid_alpha must be within [0, 1]");
        }
        for hline in &self.hlines {
            parse_color(&hline.color).with_context(|| format!("hline at y = {}", hline.y))?;
            ensure!(
                (0.0..=1.0).contains(&hline.alpha),
                "hline alpha must be within [0, 1], got {}",
                hline.alpha
            );
        }
        Ok(())
    }
}

/// Read and validate a JSON figure description.
pub fn load_figure(path: &Path) -> Result<FigureConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading figure file {}", path.display()))?;
    let config: FigureConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing figure file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid figure file {}", path.display()))?;
    Ok(config)
}

/// Resolve `path` against `base` unless it is already absolute.
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

// ---------------------------------------------------------------------------
// Built-in figures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FigurePreset {
    /// Energy vs. DMC timestep for one series of literal values.
    Timestep,
    /// Energy vs. walltime for three CSV runs.
    Walltime,
}

impl FigurePreset {
    pub fn config(self) -> FigureConfig {
        match self {
            FigurePreset::Timestep => timestep_figure(),
            FigurePreset::Walltime => walltime_figure(),
        }
    }
}

const TIMESTEPS: [f64; 16] = [
    0.001, 0.002, 0.003, 0.005, 0.008, 0.01, 0.02, 0.045, 0.05, 0.055, 0.07, 0.09, 0.1, 0.2,
    0.3, 0.5,
];
const TIMESTEP_ENERGIES: [f64; 16] = [
    -2.2454, -2.2448, -2.2448, -2.2438, -2.2451, -2.2456, -2.2464, -2.2464, -2.2464, -2.2469,
    -2.2476, -2.2481, -2.2472, -2.2525, -2.2519, -2.2568,
];
const TIMESTEP_ERRORS: [f64; 16] = [
    0.0006, 0.0009, 0.0005, 0.0003, 0.0005, 0.0005, 0.0009, 0.0004, 0.0006, 0.0004, 0.0008,
    0.0004, 0.0007, 0.001, 0.0006, 0.0008,
];

fn timestep_figure() -> FigureConfig {
    let mut theme = Theme {
        font_size: 20.0,
        line_width: 2.5,
        ..Theme::default()
    };
    theme.legend.font_size = 16.0;
    theme.legend.handle_length = 2.2;

    FigureConfig {
        title: None,
        title_wrap: FigureConfig::default_title_wrap(),
        title_font_size: None,
        // Only the exponent is math; a `$` pair around the whole label would
        // nest with the inner one.
        x_label: "Timestep (Hatree$^{-1}$)".to_string(),
        y_label: "Energy and Errorbar (Hatree)".to_string(),
        x_limits: None,
        y_limits: Some([-2.2600, -2.2400]),
        x_tick_spacing: None,
        y_tick_spacing: Some(1.0),
        hlines: vec![HLine {
            y: 0.0,
            color: "#ff0000".to_string(),
            line_width: 1.0,
            alpha: 0.5,
            dashed: true,
        }],
        grid_alpha: Some(0.2),
        theme,
        output: PathBuf::from("2eccECPnoTmoves.pdf"),
        series: vec![SeriesConfig {
            source: DataSource::Inline {
                x: TIMESTEPS.to_vec(),
                y: TIMESTEP_ENERGIES.to_vec(),
                yerr: Some(TIMESTEP_ERRORS.to_vec()),
            },
            style: StyleSpec::Preset("2enoTmoves".to_string()),
            label: None,
        }],
    }
}

/// CSV files read by the walltime figure, with their series styles.
pub const WALLTIME_RUNS: [(&str, &str); 3] = [
    ("2eccECPTQMC2.csv", "2eSRTmoves"),
    ("2eccECPnoTQMC2.csv", "2eSRnoTmoves"),
    ("2eccECPCASQMC2.csv", "2eCASnoTmoves"),
];

fn walltime_figure() -> FigureConfig {
    let series = WALLTIME_RUNS
        .iter()
        .map(|&(file, style)| SeriesConfig {
            source: DataSource::Csv {
                csv: PathBuf::from(file),
                x: "walltime".to_string(),
                y: "energy".to_string(),
                yerr: None,
            },
            style: StyleSpec::Preset(style.to_string()),
            label: None,
        })
        .collect();

    FigureConfig {
        title: Some(
            "$BeH_{2}$ instability calculation in (DMC/l-jast3/single-ref noTmoves,\
             single-ref Tmoves and CAS noTmoves)"
                .to_string(),
        ),
        title_wrap: FigureConfig::default_title_wrap(),
        title_font_size: Some(15.0),
        x_label: "Walltime".to_string(),
        y_label: "Energy [Ha]".to_string(),
        x_limits: None,
        y_limits: None,
        x_tick_spacing: None,
        y_tick_spacing: None,
        hlines: Vec::new(),
        grid_alpha: Some(0.1),
        theme: Theme::default(),
        output: PathBuf::from("2eccECPTQMCall.pdf"),
        series,
    }
}
