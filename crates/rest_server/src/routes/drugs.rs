use axum::{extract::{rejection::JsonRejection, Path, Query, State}, Json};
use serde::{Deserialize, Serialize};
use service::drug_service;
use tracing::info;

use models::drug::{self, NewDrug};
use crate::{coerce, errors::JsonApiError, state::AppState};

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 100;

/// `POST /drugs` body. Numeric fields also accept numeric strings.
#[derive(Debug, Deserialize)]
pub struct DrugCreate {
    pub name: String,
    #[serde(deserialize_with = "coerce::i32_lenient")]
    pub quantity: i32,
    #[serde(deserialize_with = "coerce::f64_lenient")]
    pub price: f64,
    pub expiry_date: String,
    pub category: String,
}

impl From<DrugCreate> for NewDrug {
    fn from(d: DrugCreate) -> Self {
        NewDrug {
            name: d.name,
            quantity: d.quantity,
            price: d.price,
            expiry_date: d.expiry_date,
            category: d.category,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct StockUpdate {
    #[serde(deserialize_with = "coerce::i32_lenient")]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Inclusive upper bound on quantity (default 100)
    pub threshold: Option<i32>,
}

#[derive(Debug, Deserialize, Serialize, PartialEq)]
pub struct DeleteOutput {
    pub success: bool,
    pub message: String,
}

#[utoipa::path(
    post, path = "/drugs", tag = "drugs",
    request_body = crate::openapi::DrugCreateDoc,
    responses(
        (status = 200, description = "Created", body = crate::openapi::DrugDoc),
        (status = 422, description = "Malformed body"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<DrugCreate>, JsonRejection>,
) -> Result<Json<drug::Model>, JsonApiError> {
    let Json(input) = body?;
    let m = drug_service::add_drug(&state.db, input.into()).await?;
    info!(id = m.id, name = %m.name, "drug added");
    Ok(Json(m))
}

#[utoipa::path(
    get, path = "/drugs/{id}", tag = "drugs",
    params(("id" = i32, Path, description = "Drug ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::DrugDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<drug::Model>, JsonApiError> {
    Ok(Json(drug_service::get_drug(&state.db, id).await?))
}

#[utoipa::path(
    put, path = "/drugs/{id}/stock", tag = "drugs",
    params(("id" = i32, Path, description = "Drug ID")),
    request_body = crate::openapi::StockUpdateDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::DrugDoc),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    body: Result<Json<StockUpdate>, JsonRejection>,
) -> Result<Json<drug::Model>, JsonApiError> {
    let Json(input) = body?;
    let m = drug_service::update_stock(&state.db, id, input.quantity).await?;
    info!(id, quantity = m.quantity, "stock updated");
    Ok(Json(m))
}

#[utoipa::path(
    delete, path = "/drugs/{id}", tag = "drugs",
    params(("id" = i32, Path, description = "Drug ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 404, description = "Not Found"),
        (status = 500, description = "Store Error")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<i32>) -> Result<Json<DeleteOutput>, JsonApiError> {
    drug_service::delete_drug(&state.db, id).await?;
    info!(id, "drug deleted");
    Ok(Json(DeleteOutput { success: true, message: format!("Drug {} deleted", id) }))
}

#[utoipa::path(
    get, path = "/drugs", tag = "drugs",
    responses(
        (status = 200, description = "All drugs by id", body = [crate::openapi::DrugDoc]),
        (status = 500, description = "Store Error")
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<drug::Model>>, JsonApiError> {
    let rows = drug_service::list_drugs(&state.db).await?;
    Ok(Json(rows))
}

#[utoipa::path(
    get, path = "/drugs/alert/low-stock", tag = "drugs",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Drugs at or below threshold, lowest first", body = [crate::openapi::DrugDoc]),
        (status = 500, description = "Store Error")
    )
)]
pub async fn low_stock(State(state): State<AppState>, Query(q): Query<LowStockQuery>) -> Result<Json<Vec<drug::Model>>, JsonApiError> {
    let threshold = q.threshold.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let rows = drug_service::low_stock(&state.db, threshold).await?;
    info!(threshold, count = rows.len(), "low stock query");
    Ok(Json(rows))
}
