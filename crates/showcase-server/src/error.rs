//! Error types for the API layer.
//!
//! [`ApiError`] unifies handler failures into a single enum that converts
//! into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use showcase_core::CoreError;

/// Errors that can occur in the API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// An invalid query parameter was provided.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The upstream catalog provider failed.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::Provider { .. } => Self::Upstream(e.to_string()),
            CoreError::Cache { .. } | CoreError::Aborted(_) => Self::Internal(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::InvalidQuery(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::Upstream(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        if status.is_server_error() {
            tracing::warn!(%status, error = %message, "Request failed");
        }

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
