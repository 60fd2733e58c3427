use std::sync::Arc;

use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::car::CarService;

use crate::{observability, openapi};

pub mod cars;
pub mod manufacturers;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub cars: Arc<CarService>,
}

impl AppState {
    pub fn new(cars: CarService) -> Self {
        Self { cars: Arc::new(cars) }
    }
}

#[utoipa::path(
    get, path = "/health", tag = "health",
    responses((status = 200, description = "Service is up", body = crate::openapi::HealthResponse))
)]
pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let cars = Router::new()
        .route("/cars", get(cars::list).post(cars::create))
        .route("/cars/:id", get(cars::get).put(cars::update).delete(cars::delete))
        .route("/manufacturers", get(manufacturers::list))
        .route("/manufacturers/:code", get(manufacturers::get));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(observability::metrics))
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .merge(cars)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
