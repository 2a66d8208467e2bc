use clap::Parser;

use qmc_plot::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    env_logger::init();
    run(Cli::parse())
}
