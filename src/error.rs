use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::store::StoreError;

/// Errors surfaced to HTTP clients as `{"detail": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")] BadRequest(String),
    #[error("{0}")] Unauthorized(String),
    #[error("{0}")] NotFound(String),
    #[error("{0}")] Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("🔥 {}", self);
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        ApiError::BadRequest(format!("Invalid form data: {}", e))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ApiError::NotFound(e.to_string()),
            StoreError::NoFields | StoreError::DuplicateEmail => ApiError::BadRequest(e.to_string()),
        }
    }
}
