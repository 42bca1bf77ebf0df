use std::net::SocketAddr;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Store(#[from] models::errors::ModelError),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: std::io::Error },
    #[error("admin server: {0}")]
    Admin(anyhow::Error),
    #[error("transport error: {0}")]
    Transport(#[from] tonic::transport::Error),
}
