//! Error-bar charts of QMC energies: parse `value(uncertainty)` tables,
//! describe figures in JSON, render them to PDF/SVG/PNG, or browse them in
//! an interactive viewer.

pub mod app;
pub mod cli;
pub mod color;
pub mod config;
pub mod data;
pub mod figure;
pub mod render;
pub mod state;
pub mod style;
pub mod ui;

pub use config::{FigureConfig, FigurePreset};
pub use data::ufloat::UFloat;
pub use figure::Figure;
