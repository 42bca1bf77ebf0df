use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

pub const DEFAULT_PORT: u16 = 8000;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: poll the store, build the app and serve HTTP until the
/// listener fails or the task is dropped.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr = cfg
        .server
        .bind_addr(DEFAULT_PORT)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = models::db::init_store(&cfg.database, &cfg.startup).await?;
    info!(service = "rest", event = "store_ready", "monolith store ready");

    let app: Router = routes::build_router(
        AppState::new(db),
        build_cors(),
        cfg.server.max_concurrent_requests,
    );

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!(%addr, max_concurrent = cfg.server.max_concurrent_requests, "rest server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
