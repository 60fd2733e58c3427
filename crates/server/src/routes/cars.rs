use axum::{
    extract::{rejection::{JsonRejection, PathRejection}, Path, State},
    http::StatusCode,
    Json,
};
use service::car::domain::{Car, CarId};
use service::errors::ServiceError;
use tracing::info;

use crate::{errors::JsonApiError, observability, routes::AppState};

#[utoipa::path(
    get, path = "/cars", tag = "cars",
    responses(
        (status = 200, description = "Stored cars, without price or address", body = [crate::openapi::CarDoc]),
        (status = 500, description = "DB Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Car>>, JsonApiError> {
    observability::record("list");
    let cars = state.cars.list().await?;
    info!(count = cars.len(), "list cars");
    Ok(Json(cars))
}

#[utoipa::path(
    post, path = "/cars", tag = "cars",
    request_body = crate::openapi::CarDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::CarDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 500, description = "DB Error", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<Car>, JsonRejection>,
) -> Result<(StatusCode, Json<Car>), JsonApiError> {
    observability::record("create");
    let Json(mut car) = payload?;
    car.id = CarId::New;
    car.validate()?;

    let saved = state.cars.save(car).await?;
    info!(car_id = ?saved.id.get(), "car_create_request");
    Ok((StatusCode::CREATED, Json(saved)))
}

#[utoipa::path(
    get, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 200, description = "Car with current price and address", body = crate::openapi::CarDoc),
        (status = 400, description = "Invalid Argument", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc),
        (status = 502, description = "Lookup Failed", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Car>, JsonApiError> {
    observability::record("get");
    let Path(id) = id?;
    Ok(Json(state.cars.find_by_id(id).await?))
}

#[utoipa::path(
    put, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    request_body = crate::openapi::CarDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::CarDoc),
        (status = 400, description = "Validation Error", body = crate::openapi::ErrorDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<Car>, JsonRejection>,
) -> Result<Json<Car>, JsonApiError> {
    observability::record("update");
    let Path(id) = id?;
    if id <= 0 {
        return Err(ServiceError::InvalidArgument(format!("car id must be positive, got {id}")).into());
    }
    let Json(mut car) = payload?;
    car.id = CarId::Existing(id);
    car.validate()?;

    let saved = state.cars.save(car).await?;
    info!(car_id = id, "car_update_request");
    Ok(Json(saved))
}

#[utoipa::path(
    delete, path = "/cars/{id}", tag = "cars",
    params(("id" = i64, Path, description = "Car id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorDoc)
    )
)]
pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, JsonApiError> {
    observability::record("delete");
    let Path(id) = id?;
    state.cars.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
