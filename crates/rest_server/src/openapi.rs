use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct DrugDoc {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub expiry_date: String,
    pub category: String,
}

#[derive(ToSchema)]
pub struct DrugCreateDoc {
    pub name: String,
    pub quantity: i32,
    pub price: f64,
    pub expiry_date: String,
    pub category: String,
}

#[derive(ToSchema)]
pub struct StockUpdateDoc { pub quantity: i32 }

#[derive(OpenApi)]
#[openapi(
    info(title = "Pharmacy Monolith REST API"),
    paths(
        crate::routes::health,
        crate::routes::drugs::create,
        crate::routes::drugs::get,
        crate::routes::drugs::update_stock,
        crate::routes::drugs::delete,
        crate::routes::drugs::list,
        crate::routes::drugs::low_stock,
    ),
    components(
        schemas(
            HealthResponse,
            DrugDoc,
            DrugCreateDoc,
            StockUpdateDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "drugs")
    )
)]
pub struct ApiDoc;
