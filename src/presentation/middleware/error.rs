use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::value_objects::IdentifierError;
use crate::infrastructure::storage::ProxyError;

/// Non-standard status returned when a capability key does not verify
pub const INVALID_KEY_STATUS: u16 = 566;

/// Application error types that can be converted to HTTP responses
///
/// Responses never carry a body, clients only see the status code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid capability key")]
    InvalidKey,

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Invalid request: {message}")]
    BadRequest { message: String },

    #[error("Method not allowed: {method}")]
    MethodNotAllowed { method: String },

    #[error("Object storage error: {message}")]
    Upstream { message: String },

    #[error("Internal server error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidKey => {
                StatusCode::from_u16(INVALID_KEY_STATUS).unwrap_or(StatusCode::FORBIDDEN)
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type for logging
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidKey => "invalid_key",
            AppError::NotFound { .. } => "not_found",
            AppError::BadRequest { .. } => "bad_request",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
            AppError::Upstream { .. } => "upstream",
            AppError::Internal { .. } => "internal",
        }
    }

    /// Check if this error should be logged as an error (vs warning)
    pub fn should_log_as_error(&self) -> bool {
        matches!(self, AppError::Upstream { .. } | AppError::Internal { .. })
    }

    /// Empty-bodied response with the matching status, without logging
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = self.status_code();
        response
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.should_log_as_error() {
            error!(error_type = self.error_type(), "Application error: {}", self);
        } else {
            warn!(error_type = self.error_type(), "Application warning: {}", self);
        }

        self.to_response()
    }
}

impl From<ProxyError> for AppError {
    fn from(err: ProxyError) -> Self {
        match err {
            ProxyError::Client { message } | ProxyError::Response { message } => {
                AppError::Internal { message }
            }
            other => AppError::Upstream { message: other.to_string() },
        }
    }
}

impl From<IdentifierError> for AppError {
    fn from(err: IdentifierError) -> Self {
        AppError::BadRequest { message: err.to_string() }
    }
}
