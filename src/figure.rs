use std::path::Path;

use anyhow::{Context, Result};

use crate::color::generate_palette;
use crate::config::{resolve_path, DataSource, FigureConfig, StyleSpec};
use crate::data::series::{merge_bounds, ErrorSeries};
use crate::data::table::MeasurementTable;
use crate::render::ticks::axis_range;
use crate::style::{self, ResolvedStyle};

// ---------------------------------------------------------------------------
// Figure – a configuration with its data loaded
// ---------------------------------------------------------------------------

/// One trace ready to draw.
#[derive(Debug, Clone)]
pub struct PlotSeries {
    pub data: ErrorSeries,
    pub style: ResolvedStyle,
    /// Source table for CSV-backed series.
    pub table: Option<MeasurementTable>,
    /// Human-readable origin ("file.csv" or "inline").
    pub origin: String,
}

#[derive(Debug, Clone)]
pub struct Figure {
    pub config: FigureConfig,
    pub series: Vec<PlotSeries>,
}

impl Figure {
    /// Load every series of `config`. Relative CSV paths resolve against `data_dir`.
    pub fn from_config(config: FigureConfig, data_dir: &Path) -> Result<Self> {
        config.validate()?;

        let fallback_colors = generate_palette(config.series.len());
        let mut series = Vec::with_capacity(config.series.len());

        for (i, (sc, fallback)) in config.series.iter().zip(fallback_colors).enumerate() {
            let (data, table, origin) = load_source(&sc.source, data_dir)
                .with_context(|| format!("loading data for series {i}"))?;

            let mut style = match &sc.style {
                StyleSpec::Preset(name) => style::preset(name)?,
                StyleSpec::Custom(s) => s.clone(),
            };
            if let Some(label) = &sc.label {
                style.label = label.clone();
            }
            let style = style
                .resolve(fallback, &config.theme)
                .with_context(|| format!("resolving style of series {i}"))?;

            if data.is_empty() {
                log::warn!("series '{}' from {origin} has no rows", style.label);
            }
            log::info!(
                "Loaded series '{}' from {origin}: {} points",
                style.label,
                data.len()
            );

            series.push(PlotSeries {
                data,
                style,
                table,
                origin,
            });
        }

        Ok(Figure { config, series })
    }

    pub fn output(&self) -> &Path {
        &self.config.output
    }

    /// Displayed x interval: configured limits or data bounds plus margins.
    pub fn x_range(&self) -> (f64, f64) {
        let bounds = self
            .series
            .iter()
            .fold(None, |acc, s| merge_bounds(acc, s.data.x_bounds()));
        axis_range(self.config.x_limits, bounds)
    }

    /// Displayed y interval, including error bars and reference lines.
    pub fn y_range(&self) -> (f64, f64) {
        let data = self
            .series
            .iter()
            .fold(None, |acc, s| merge_bounds(acc, s.data.y_bounds()));
        let bounds = self
            .config
            .hlines
            .iter()
            .fold(data, |acc, h| merge_bounds(acc, Some((h.y, h.y))));
        axis_range(self.config.y_limits, bounds)
    }

    /// Loaded CSV tables with their origin, in series order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &MeasurementTable)> {
        self.series
            .iter()
            .filter_map(|s| s.table.as_ref().map(|t| (s.origin.as_str(), t)))
    }
}

fn load_source(
    source: &DataSource,
    data_dir: &Path,
) -> Result<(ErrorSeries, Option<MeasurementTable>, String)> {
    match source {
        DataSource::Csv { csv, x, y, yerr } => {
            let path = resolve_path(data_dir, csv);
            let table = MeasurementTable::from_path(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            let data = ErrorSeries::from_table(&table, x, y, yerr.as_deref())
                .with_context(|| format!("extracting columns from {}", path.display()))?;
            Ok((data, Some(table), csv.display().to_string()))
        }
        DataSource::Inline { x, y, yerr } => {
            let yerr = yerr.clone().unwrap_or_else(|| vec![0.0; y.len()]);
            let data = ErrorSeries::new(x.clone(), y.clone(), yerr)?;
            Ok((data, None, "inline".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::config::{FigurePreset, SeriesConfig};

    #[test]
    fn timestep_preset_loads_inline_data() {
        let figure = Figure::from_config(FigurePreset::Timestep.config(), Path::new(".")).unwrap();
        assert_eq!(figure.series.len(), 1);
        assert_eq!(figure.series[0].data.len(), 16);
        assert_eq!(figure.series[0].style.label, "2e- ccECP no Tmoves");
        assert_eq!(figure.y_range(), (-2.26, -2.24));
        assert_eq!(figure.tables().count(), 0);
    }

    #[test]
    fn walltime_preset_reads_csvs_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        for (file, _) in crate::config::WALLTIME_RUNS {
            fs::write(
                dir.path().join(file),
                "walltime,energy\n100,-2.2454(6)\n200,-2.2461(4)\n",
            )
            .unwrap();
        }

        let figure = Figure::from_config(FigurePreset::Walltime.config(), dir.path()).unwrap();
        assert_eq!(figure.series.len(), 3);
        assert_eq!(figure.tables().count(), 3);

        let (lo, hi) = figure.x_range();
        assert!(lo < 100.0 && hi > 200.0);
    }

    #[test]
    fn missing_csv_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Figure::from_config(FigurePreset::Walltime.config(), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("2eccECPTQMC2.csv"));
    }

    #[test]
    fn label_override_and_missing_errors() {
        let mut config = FigurePreset::Timestep.config();
        config.series = vec![SeriesConfig {
            source: DataSource::Inline {
                x: vec![1.0, 2.0],
                y: vec![3.0, 4.0],
                yerr: None,
            },
            style: StyleSpec::Preset("2eTmoves".into()),
            label: Some("custom".into()),
        }];
        config.output = PathBuf::from("x.svg");

        let figure = Figure::from_config(config, Path::new(".")).unwrap();
        assert_eq!(figure.series[0].style.label, "custom");
        assert_eq!(figure.series[0].data.yerr, vec![0.0, 0.0]);
        assert_eq!(figure.output(), Path::new("x.svg"));
    }

    #[test]
    fn misaligned_inline_columns_fail() {
        let mut config = FigurePreset::Timestep.config();
        config.series[0].source = DataSource::Inline {
            x: vec![1.0, 2.0, 3.0],
            y: vec![3.0, 4.0],
            yerr: None,
        };
        assert!(Figure::from_config(config, Path::new(".")).is_err());
    }
}
