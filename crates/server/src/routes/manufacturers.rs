use axum::{
    extract::{rejection::PathRejection, Path, State},
    Json,
};
use service::car::domain::Manufacturer;

use crate::{errors::JsonApiError, observability, routes::AppState};

#[utoipa::path(
    get, path = "/manufacturers", tag = "manufacturers",
    responses((status = 200, description = "Known manufacturers", body = [crate::openapi::ManufacturerDoc]))
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Manufacturer>>, JsonApiError> {
    observability::record("list_manufacturers");
    Ok(Json(state.cars.list_manufacturers().await?))
}

#[utoipa::path(
    get, path = "/manufacturers/{code}", tag = "manufacturers",
    params(("code" = i32, Path, description = "Manufacturer code")),
    responses(
        (status = 200, description = "Found", body = crate::openapi::ManufacturerDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    code: Result<Path<i32>, PathRejection>,
) -> Result<Json<Manufacturer>, JsonApiError> {
    observability::record("get_manufacturer");
    let Path(code) = code?;
    Ok(Json(state.cars.find_manufacturer(code).await?))
}
