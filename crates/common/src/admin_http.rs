//! Lightweight admin HTTP server
//!
//! Exposes `/healthz` and `/metrics` next to a service whose main port does
//! not speak plain HTTP. Metrics are rendered by the caller.

use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

pub type MetricsFn = fn() -> (StatusCode, String);

async fn healthz() -> &'static str { "OK" }

pub fn admin_router(metrics_fn: MetricsFn) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Bind the admin listener and serve it on a background task.
/// Bind errors are returned to the caller; serve errors are logged.
pub async fn spawn_admin_server(
    addr: SocketAddr,
    metrics_fn: MetricsFn,
) -> anyhow::Result<(SocketAddr, JoinHandle<()>)> {
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(addr = %local, "admin server listening");
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, admin_router(metrics_fn)).await {
            error!(error = %e, "admin server stopped");
        }
    });
    Ok((local, handle))
}
