use std::net::SocketAddr;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// JSON error body: `{"detail": <text>}`, plus `"error": <title>` for
/// server-side failures.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: Option<&'static str>,
    pub detail: String,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: Option<&'static str>, detail: impl Into<String>) -> Self {
        Self { status, error, detail: detail.into() }
    }

    pub fn drug_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, None, "Drug not found")
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::NotFound(_) => Self::drug_not_found(),
            other => {
                error!(err = %other, "store operation failed");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, Some("Store Error"), other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::new(r.status(), None, r.body_text())
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let body = match self.error {
            Some(error) => serde_json::json!({ "error": error, "detail": self.detail }),
            None => serde_json::json!({ "detail": self.detail }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Store(#[from] models::errors::ModelError),
    #[error("cannot bind {addr}: {source}")]
    Bind { addr: SocketAddr, source: std::io::Error },
    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
