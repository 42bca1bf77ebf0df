use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

/// Render benchmark results as a 2x2 SVG chart.
#[derive(Parser, Debug)]
#[command(name = "plot")]
#[command(version)]
struct Cli {
    /// Results file written by `bench`
    #[arg(long, short = 'i', default_value = "results.json")]
    input: PathBuf,

    /// Output SVG path
    #[arg(long, short = 'o', default_value = "performance_comparison.svg")]
    output: PathBuf,
}

fn main() -> ExitCode {
    common::utils::logging::init_logging_default();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "plot", event = "run_failed", error = %format!("{e:#}"), "plot failed");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let results = bench::BenchResults::load(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;
    bench::plot::render_svg(&results, &cli.output)
        .with_context(|| format!("rendering {}", cli.output.display()))?;
    info!(service = "plot", event = "saved", path = %cli.output.display(), "chart saved");
    Ok(())
}
