//! Command-line front end.
//!
//! Commands:
//! - qmc-plot render <FIGURE.json>
//! - qmc-plot preset <timestep|walltime>
//! - qmc-plot table <CSV>

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::app::run_viewer;
use crate::config::{load_figure, FigureConfig, FigurePreset};
use crate::data::table::MeasurementTable;
use crate::figure::Figure;
use crate::render::save_figure;

/// Publication-style error-bar charts for QMC energy tables
#[derive(Parser, Debug)]
#[command(name = "qmc-plot")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by the commands that produce a figure.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct RenderOpts {
    /// Write the figure here instead of the configured output path
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Directory that relative CSV paths resolve against
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Open the interactive viewer after saving
    #[arg(long, default_value_t = false)]
    pub show: bool,

    /// Do not print the loaded data tables
    #[arg(long, short, default_value_t = false)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a figure described by a JSON file
    Render {
        /// Path to the figure description
        #[arg(value_name = "FIGURE")]
        figure: PathBuf,

        #[command(flatten)]
        opts: RenderOpts,
    },

    /// Render one of the built-in figures
    Preset {
        #[arg(value_enum)]
        name: FigurePreset,

        #[command(flatten)]
        opts: RenderOpts,

        /// Print the preset as JSON instead of rendering it
        #[arg(long, default_value_t = false)]
        dump_config: bool,
    },

    /// Print a CSV file with measurements in value(uncertainty) notation
    Table {
        #[arg(value_name = "CSV")]
        csv: PathBuf,

        /// Significant digits of the uncertainty
        #[arg(long, default_value_t = 1)]
        digits: usize,
    },
}

/// Execute a parsed command line.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Render { figure, opts } => {
            let config = load_figure(&figure)?;
            let base = figure
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            render(config, base, &opts)
        }
        Command::Preset {
            name,
            opts,
            dump_config,
        } => {
            let config = name.config();
            if dump_config {
                println!("{}", serde_json::to_string_pretty(&config)?);
                return Ok(());
            }
            render(config, Path::new("."), &opts)
        }
        Command::Table { csv, digits } => {
            let table = MeasurementTable::from_path(&csv)
                .with_context(|| format!("reading {}", csv.display()))?;
            println!("{table:.digits$}");
            Ok(())
        }
    }
}

/// Load, print, save and optionally show one figure.
fn render(mut config: FigureConfig, default_base: &Path, opts: &RenderOpts) -> Result<()> {
    if let Some(output) = &opts.output {
        config.output = output.clone();
    }
    let base = opts.data_dir.as_deref().unwrap_or(default_base);
    let figure = Figure::from_config(config, base)?;

    if !opts.quiet {
        for (origin, table) in figure.tables() {
            println!("{origin}\n{table}\n");
        }
    }

    save_figure(&figure, figure.output())
        .with_context(|| format!("saving {}", figure.output().display()))?;

    if opts.show {
        run_viewer(figure)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_render_with_shared_options() {
        let cli = Cli::try_parse_from([
            "qmc-plot", "render", "fig.json", "--output", "out.svg", "--data-dir", "runs", "--quiet",
        ])
        .unwrap();
        match cli.command {
            Command::Render { figure, opts } => {
                assert_eq!(figure, PathBuf::from("fig.json"));
                assert_eq!(opts.output, Some(PathBuf::from("out.svg")));
                assert_eq!(opts.data_dir, Some(PathBuf::from("runs")));
                assert!(opts.quiet);
                assert!(!opts.show);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_preset_names() {
        let cli = Cli::try_parse_from(["qmc-plot", "preset", "walltime", "--dump-config"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Preset {
                name: FigurePreset::Walltime,
                dump_config: true,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["qmc-plot", "preset", "energy"]).is_err());
    }

    #[test]
    fn table_digits_default_to_one() {
        let cli = Cli::try_parse_from(["qmc-plot", "table", "a.csv"]).unwrap();
        assert!(matches!(cli.command, Command::Table { digits: 1, .. }));
    }

    #[test]
    fn dump_config_needs_no_data() {
        let cli = Cli::try_parse_from(["qmc-plot", "preset", "timestep", "--dump-config"]).unwrap();
        run(cli).unwrap();
    }

    #[test]
    fn render_reports_missing_figure_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = run(Cli {
            command: Command::Render {
                figure: path,
                opts: RenderOpts::default(),
            },
        })
        .unwrap_err();
        assert!(format!("{err:#}").contains("absent.json"));
    }
}
