use configs::AppConfig;
use sea_orm::DatabaseConnection;
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::server::Router;
use tonic::transport::Server;
use tower::layer::util::{Identity, Stack};
use tower::limit::GlobalConcurrencyLimitLayer;
use tracing::info;

use crate::errors::StartupError;
use crate::proto::pharmacy_service_server::PharmacyServiceServer;
use crate::pharmacy_service::PharmacyServiceImpl;

pub const DEFAULT_PORT: u16 = 50051;

pub type LimitedRouter = Router<Stack<GlobalConcurrencyLimitLayer, Identity>>;

/// gRPC router with the pharmacy service mounted. At most `max_concurrent`
/// calls run at once across all connections; the rest wait for a permit.
pub fn router(db: DatabaseConnection, max_concurrent: usize) -> LimitedRouter {
    Server::builder()
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent))
        .add_service(PharmacyServiceServer::new(PharmacyServiceImpl::new(db)))
}

/// Serve on an already bound listener.
pub async fn serve_with_listener(
    listener: TcpListener,
    db: DatabaseConnection,
    max_concurrent: usize,
) -> Result<(), StartupError> {
    router(db, max_concurrent)
        .serve_with_incoming(TcpListenerStream::new(listener))
        .await?;
    Ok(())
}

/// Public entry: poll the store, start the admin side port, then serve gRPC
/// until the transport fails or the task is dropped.
pub async fn run(cfg: AppConfig) -> Result<(), StartupError> {
    let addr = cfg
        .server
        .bind_addr(DEFAULT_PORT)
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    let admin_addr = cfg
        .server
        .admin_addr()
        .map_err(|e| StartupError::InvalidConfig(e.to_string()))?;

    let db = models::db::init_store(&cfg.database, &cfg.startup).await?;
    info!(service = "rpc", event = "store_ready", "microservice store ready");

    let (admin_local, _admin) =
        common::admin_http::spawn_admin_server(admin_addr, service::observability::encode_metrics)
            .await
            .map_err(StartupError::Admin)?;

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    info!(%addr, admin = %admin_local, max_concurrent = cfg.server.max_concurrent_requests, "rpc server listening");

    serve_with_listener(listener, db, cfg.server.max_concurrent_requests).await
}
