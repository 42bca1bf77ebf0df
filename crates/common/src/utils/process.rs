//! Process scaffolding shared by the server binaries.

use std::fmt::Display;
use std::future::Future;
use std::process::ExitCode;

use tracing::{error, info};
use uuid::Uuid;

/// How a supervised service ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Stopped,
    Failed,
    Interrupted,
}

impl From<Outcome> for ExitCode {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::Stopped | Outcome::Interrupted => ExitCode::SUCCESS,
            Outcome::Failed => ExitCode::FAILURE,
        }
    }
}

/// Spawn `run` and wait for it or Ctrl+C, whichever comes first.
pub async fn supervise<F, E>(service: &'static str, service_id: Uuid, run: F) -> Outcome
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let pid = std::process::id();
    let task = tokio::spawn(run);

    tokio::select! {
        res = task => match res {
            Ok(Ok(())) => {
                info!(service, event = "stop", %service_id, pid, "service stopped");
                Outcome::Stopped
            }
            Ok(Err(e)) => {
                error!(service, event = "run_failed", error = %e, "service failed");
                Outcome::Failed
            }
            Err(e) => {
                error!(service, event = "task_join_error", error = %e, "service task join error");
                Outcome::Failed
            }
        },
        _ = tokio::signal::ctrl_c() => {
            info!(service, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
            Outcome::Interrupted
        }
    }
}

/// Install the panic hook, build the runtime and block on `run` under [`supervise`].
pub fn run_service<F, E>(service: &'static str, worker_threads: Option<usize>, run: F) -> ExitCode
where
    F: Future<Output = Result<(), E>> + Send + 'static,
    E: Display + Send + 'static,
{
    let service_id = Uuid::new_v4();
    let pid = std::process::id();

    std::panic::set_hook(Box::new(move |info| {
        error!(service, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads { builder.worker_threads(w); }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service,
        event = "start",
        %service_id,
        pid,
        threads = worker_threads.unwrap_or_default(),
        "service starting"
    );

    rt.block_on(supervise(service, service_id, run)).into()
}
