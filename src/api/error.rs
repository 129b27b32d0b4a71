//! HTTP error responses
//!
//! Every error leaves the server as `{"error": "<message>"}`. Internal
//! failures are logged with their cause and answered with a generic message.

use crate::error::TriageError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error returned by request handlers
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not valid JSON
    #[error("Invalid JSON")]
    InvalidJson,

    /// `text` missing, not a string, or blank
    #[error("\"text\" is required and must be a non-empty string")]
    MissingText,

    /// Unknown path or method
    #[error("Not found")]
    NotFound,

    /// Storage or counter failure
    #[error("Internal server error")]
    Internal(#[from] TriageError),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson | ApiError::MissingText => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref cause) = self {
            error!("Request failed: {}", cause);
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
