//! Unified error types for the API service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Errors returned to API clients.
///
/// The `Display` text is the client-facing message placed in the failure
/// envelope.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Request body is not valid JSON for the expected shape.
    #[error("Invalid request body")]
    InvalidBody,

    /// A required field is empty or missing.
    #[error("Name and email are required")]
    MissingFields,

    /// Path segment is not an integer.
    #[error("Invalid user ID")]
    InvalidUserId,

    /// No user with the requested ID.
    #[error("User not found")]
    UserNotFound,

    /// Unexpected server fault.
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody | ApiError::MissingFields | ApiError::InvalidUserId => {
                StatusCode::BAD_REQUEST
            }
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiResponse::<()>::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

/// Fatal errors raised while starting the service.
#[derive(Error, Debug)]
pub enum StartupError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Frontend URL cannot be used as a CORS origin.
    #[error("invalid frontend origin: {0:?}")]
    InvalidOrigin(String),

    /// Listener failed to bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The address that failed.
        addr: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Metrics recorder could not be installed.
    #[error("metrics error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    /// The listener failed while serving.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, StartupError>;
