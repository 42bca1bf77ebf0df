use std::process::ExitCode;

use dotenvy::dotenv;
use tracing::{error, info};

const SERVICE: &str = "rpc";

fn main() -> ExitCode {
    // load .env first so RUST_LOG / LOG_FORMAT take effect
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    info!(service = SERVICE, version = env!("CARGO_PKG_VERSION"), event = "logger_init", "tracing subscriber initialized");

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = SERVICE, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    common::utils::process::run_service(SERVICE, cfg.server.worker_threads, rpc_server::run(cfg))
}
