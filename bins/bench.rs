use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

/// Drive both services with batches of concurrent callers and record
/// latency and throughput per batch.
#[derive(Parser, Debug)]
#[command(name = "bench")]
#[command(version)]
struct Cli {
    /// gRPC endpoint of the microservice
    #[arg(long, default_value = "http://127.0.0.1:50051")]
    grpc_addr: String,

    /// Base URL of the REST monolith
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    rest_url: String,

    /// Concurrent user counts, one batch each
    #[arg(long, value_delimiter = ',', default_value = "10,50,100,500,1000")]
    users: Vec<usize>,

    /// Results file
    #[arg(long, short = 'o', default_value = "results.json")]
    output: PathBuf,

    /// Pause between batches in milliseconds
    #[arg(long, default_value = "1000")]
    pause_ms: u64,

    /// Per-call timeout in seconds
    #[arg(long, default_value = "10")]
    timeout_secs: u64,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_from_env();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(service = "bench", event = "run_failed", error = %format!("{e:#}"), "benchmark failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    anyhow::ensure!(!cli.users.is_empty(), "--users must list at least one count");
    let cfg = bench::BenchConfig {
        grpc_addr: cli.grpc_addr,
        rest_url: cli.rest_url,
        users: cli.users,
        pause: Duration::from_millis(cli.pause_ms),
        timeout: Duration::from_secs(cli.timeout_secs),
    };
    info!(service = "bench", event = "start", grpc = %cfg.grpc_addr, rest = %cfg.rest_url, users = ?cfg.users, "starting benchmark");

    let results = bench::run_all(&cfg).await?;
    println!("{}", results.render_tables());

    results
        .save(&cli.output)
        .with_context(|| format!("writing {}", cli.output.display()))?;
    info!(service = "bench", event = "saved", path = %cli.output.display(), "results saved");
    Ok(())
}
