use axum::Json;
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorDoc {
    pub error: String,
    pub detail: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ManufacturerDoc {
    /// Null or 0 for a manufacturer that is not stored yet.
    pub code: Option<i32>,
    pub name: String,
}

#[derive(Serialize, ToSchema)]
pub struct LocationDoc {
    pub lat: f64,
    pub lon: f64,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailsDoc {
    pub manufacturer: Option<ManufacturerDoc>,
    pub model: String,
    pub mileage: i32,
    pub external_color: Option<String>,
    pub body: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub number_of_doors: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarDoc {
    /// Null or 0 for a car that is not stored yet.
    pub id: Option<i64>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    /// `NEW` or `USED`
    pub condition: String,
    pub details: DetailsDoc,
    pub location: Option<LocationDoc>,
    /// Filled on single-car reads only, e.g. `USD 12345.67`.
    pub price: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::cars::list,
        crate::routes::cars::create,
        crate::routes::cars::get,
        crate::routes::cars::update,
        crate::routes::cars::delete,
        crate::routes::manufacturers::list,
        crate::routes::manufacturers::get,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            ManufacturerDoc,
            LocationDoc,
            DetailsDoc,
            CarDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "cars"),
        (name = "manufacturers")
    )
)]
pub struct ApiDoc;

/// `GET /api-docs/openapi.json`
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
