//! Unified error types for the users API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Process-level error type (startup, configuration, I/O).
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but rejected by validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failed to install the Prometheus exporter.
    #[error("metrics exporter error: {0}")]
    Metrics(String),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request-local errors. Each one is terminal for its request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required body field was absent or falsy.
    #[error("Name and email are required")]
    Validation,

    /// No seed user matches the requested id.
    #[error("User not found")]
    UserNotFound,

    /// No handler is bound to the method and path.
    #[error("Route not found")]
    RouteNotFound,

    /// Anything else. The cause is logged, never sent to the caller.
    #[error("Something went wrong!")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
    /// Wrap an arbitrary fault as an internal error.
    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Internal(err.into())
    }

    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation => StatusCode::BAD_REQUEST,
            Self::UserNotFound | Self::RouteNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error payload: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Human readable message.
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(source) = &self {
            error!(error = %source, "request failed with internal error");
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Convenient Result type alias for process-level operations.
pub type Result<T> = std::result::Result<T, AppError>;
