use axum::{
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod drugs;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "Service is up")))]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

async fn metrics() -> (StatusCode, String) {
    service::observability::encode_metrics()
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: drug CRUD plus health, metrics and
/// the OpenAPI document. At most `max_concurrent` requests run at once.
pub fn build_router(state: AppState, cors: CorsLayer, max_concurrent: usize) -> Router {
    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(openapi_json));

    let drug_routes = Router::new()
        .route("/drugs", get(drugs::list).post(drugs::create))
        .route("/drugs/alert/low-stock", get(drugs::low_stock))
        .route("/drugs/:id", get(drugs::get).delete(drugs::delete))
        .route("/drugs/:id/stock", put(drugs::update_stock))
        .with_state(state);

    public
        .merge(drug_routes)
        .layer(GlobalConcurrencyLimitLayer::new(max_concurrent))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::DEBUG),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
