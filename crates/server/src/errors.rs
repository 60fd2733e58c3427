use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use common::types::ErrorBody;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

use crate::observability::LOOKUP_FAILURES_TOTAL;

/// Error half of every handler result, rendered as `{"error", "detail"}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub title: &'static str,
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, title: &'static str, detail: Option<String>) -> Self {
        Self { status, title, detail }
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody::new(self.title, self.detail))).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let detail = Some(e.to_string());
        match e {
            ServiceError::InvalidArgument(_) => Self::new(StatusCode::BAD_REQUEST, "Invalid Argument", detail),
            ServiceError::Validation(_) | ServiceError::Model(models::errors::ModelError::Validation(_)) => {
                Self::new(StatusCode::BAD_REQUEST, "Validation Error", detail)
            }
            ServiceError::NotFound(_) => Self::new(StatusCode::NOT_FOUND, "Not Found", detail),
            ServiceError::Client(c) => {
                LOOKUP_FAILURES_TOTAL.with_label_values(&[c.service()]).inc();
                error!(service = c.service(), error = %c, "lookup failed");
                Self::new(StatusCode::BAD_GATEWAY, "Lookup Failed", detail)
            }
            ServiceError::Db(_) | ServiceError::Model(_) => {
                error!(error = ?detail, "store failure");
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, "DB Error", detail)
            }
        }
    }
}

impl From<JsonRejection> for JsonApiError {
    fn from(r: JsonRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid Body", Some(r.body_text()))
    }
}

impl From<PathRejection> for JsonApiError {
    fn from(r: PathRejection) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Invalid Path", Some(r.body_text()))
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("lookup client: {0}")]
    Client(#[from] service::clients::ClientError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
