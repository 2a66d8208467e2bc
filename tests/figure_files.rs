use std::fs;
use std::path::Path;

use qmc_plot::config::{load_figure, DataSource, StyleSpec};
use qmc_plot::data::table::MeasurementTable;
use qmc_plot::render::OutputFormat;
use qmc_plot::style::{LineStyle, Marker};
use qmc_plot::{Figure, FigurePreset};

const RUN_A: &str = "walltime,energy\n\
                     600,-2.2454(6)\n\
                     1200,-2.2461(4)\n\
                     1800,-2.24630(35)\n";

const RUN_B: &str = "walltime,energy,error\n\
                     600,-2.2440,0.0010\n\
                     1200,-2.2450,0.0008\n";

const FIGURE: &str = r##"{
    "title": "$BeH_{2}$ test runs",
    "x_label": "Walltime",
    "y_label": "Energy [Ha]",
    "grid_alpha": 0.1,
    "output": "runs.svg",
    "series": [
        {"source": {"csv": "data/a.csv", "x": "walltime", "y": "energy"},
         "style": "2eSRTmoves"},
        {"source": {"csv": "data/b.csv", "x": "walltime", "y": "energy", "yerr": "error"},
         "style": {"label": "run B", "color": "tab:purple", "marker": "diamond",
                   "line_style": "none"}}
    ]
}"##;

fn write_project(dir: &Path) {
    fs::create_dir_all(dir.join("data")).unwrap();
    fs::write(dir.join("data/a.csv"), RUN_A).unwrap();
    fs::write(dir.join("data/b.csv"), RUN_B).unwrap();
    fs::write(dir.join("figure.json"), FIGURE).unwrap();
}

#[test]
fn figure_file_loads_csv_series_relative_to_its_directory() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let config = load_figure(&dir.path().join("figure.json")).unwrap();
    assert!(matches!(config.series[0].style, StyleSpec::Preset(_)));
    assert!(matches!(config.series[1].source, DataSource::Csv { .. }));

    let figure = Figure::from_config(config, dir.path()).unwrap();
    assert_eq!(figure.series.len(), 2);

    let a = &figure.series[0];
    assert_eq!(a.data.x, vec![600.0, 1200.0, 1800.0]);
    assert_eq!(a.data.y, vec![-2.2454, -2.2461, -2.2463]);
    assert!((a.data.yerr[2] - 0.00035).abs() < 1e-12);
    assert_eq!(a.origin, "data/a.csv");

    let b = &figure.series[1];
    assert_eq!(b.style.label, "run B");
    assert_eq!(b.style.marker, Marker::Diamond);
    assert_eq!(b.style.line_style, LineStyle::None);
    assert_eq!(b.data.yerr, vec![0.0010, 0.0008]);

    assert_eq!(
        OutputFormat::from_path(figure.output()).unwrap(),
        OutputFormat::Svg
    );
}

#[test]
fn autoscaled_y_range_covers_error_bars() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let config = load_figure(&dir.path().join("figure.json")).unwrap();
    let figure = Figure::from_config(config, dir.path()).unwrap();

    let (lo, hi) = figure.y_range();
    assert!(lo < -2.2463 - 0.00035);
    assert!(hi > -2.2440 + 0.0010);
}

#[test]
fn loaded_tables_print_in_shorthand() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());

    let table = MeasurementTable::from_path(&dir.path().join("data/a.csv")).unwrap();
    let text = table.to_string();
    assert!(text.contains("walltime"));
    assert!(text.contains("-2.2454(6)"));
    assert!(text.contains("-2.2463(4)"));

    let two_digits = format!("{table:.2}");
    assert!(two_digits.contains("-2.24630(35)"));
}

#[test]
fn unknown_column_is_reported_with_the_file() {
    let dir = tempfile::tempdir().unwrap();
    write_project(dir.path());
    let broken = FIGURE.replace(r#""y": "energy"},"#, r#""y": "total_energy"},"#);
    fs::write(dir.path().join("figure.json"), broken).unwrap();

    let config = load_figure(&dir.path().join("figure.json")).unwrap();
    let err = Figure::from_config(config, dir.path()).unwrap_err();
    let message = format!("{err:#}");
    assert!(message.contains("a.csv"));
    assert!(message.contains("total_energy"));
}

#[test]
fn timestep_preset_needs_no_files() {
    let figure = Figure::from_config(FigurePreset::Timestep.config(), Path::new("/nonexistent")).unwrap();
    assert_eq!(figure.output(), Path::new("2eccECPnoTmoves.pdf"));
    assert_eq!(figure.series[0].data.len(), 16);
}
