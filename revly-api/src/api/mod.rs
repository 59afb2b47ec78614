//! HTTP API handlers for revly-api

pub mod approve;
pub mod health;
pub mod listings;
pub mod reviews;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// Route-level errors mapped to JSON error responses
#[derive(Debug)]
pub enum ApiError {
    /// Invalid request input (400)
    BadRequest(String),
    /// Internal failure (500)
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<revly_common::Error> for ApiError {
    fn from(err: revly_common::Error) -> Self {
        match err {
            revly_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}
