//! Error types for the HTTP layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body of every 400 response. Parser and validator
/// details stay in the logs.
pub const INVALID_DATA: &str = "Invalid data";

/// Body of every 404 response.
pub const NOT_FOUND: &str = "Not Found.";

/// Errors that can occur while serving a request.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The submission failed decoding or validation. Nothing was written.
    #[error("invalid submission")]
    InvalidData,

    /// The result store failed; the message is what the caller will see.
    #[error("store error: {0}")]
    Store(String),

    /// No route matches the path and method.
    #[error("not found")]
    NotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidData => (StatusCode::BAD_REQUEST, INVALID_DATA).into_response(),
            Self::NotFound => (StatusCode::NOT_FOUND, NOT_FOUND).into_response(),
            Self::Store(message) => {
                let body = serde_json::json!({ "error": message });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}
