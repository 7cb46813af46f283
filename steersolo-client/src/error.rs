//! Client error types

use shared::error::{AppError, ErrorCode};
use shared::{DecodeError, StorageError};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Conflict (unique constraint, duplicate row)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Backend-side failure
    #[error("Backend error ({status}): {body}")]
    Backend { status: u16, body: String },

    /// Response body is not what the endpoint promises
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Response could not be decoded into the expected record
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Local preferences store failed
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Business-rule error raised before any request was sent
    #[error(transparent)]
    App(#[from] AppError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Map an HTTP error status and body to a client error
    pub fn from_status(status: reqwest::StatusCode, body: String) -> Self {
        match status {
            reqwest::StatusCode::UNAUTHORIZED => ClientError::Unauthorized,
            reqwest::StatusCode::FORBIDDEN => ClientError::Forbidden(body),
            reqwest::StatusCode::NOT_FOUND => ClientError::NotFound(body),
            reqwest::StatusCode::CONFLICT => ClientError::Conflict(body),
            reqwest::StatusCode::BAD_REQUEST | reqwest::StatusCode::UNPROCESSABLE_ENTITY => {
                ClientError::Validation(body)
            }
            _ => ClientError::Backend {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// Structured code for frontend i18n lookup
    pub fn code(&self) -> ErrorCode {
        match self {
            ClientError::Http(e) if e.is_timeout() => ErrorCode::TimeoutError,
            ClientError::Http(_) => ErrorCode::NetworkError,
            ClientError::Unauthorized => ErrorCode::NotAuthenticated,
            ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
            ClientError::NotFound(_) => ErrorCode::NotFound,
            ClientError::Conflict(_) => ErrorCode::AlreadyExists,
            ClientError::Validation(_) => ErrorCode::ValidationFailed,
            ClientError::Backend { status, .. } => http::StatusCode::from_u16(*status)
                .map(ErrorCode::from_http_status)
                .unwrap_or(ErrorCode::InternalError),
            ClientError::InvalidResponse(_) => ErrorCode::DecodeFailed,
            ClientError::Decode(e) => e.code(),
            ClientError::Storage(_) => ErrorCode::StorageError,
            ClientError::App(e) => e.code,
            ClientError::Config(_) => ErrorCode::ConfigError,
        }
    }
}

impl From<ClientError> for AppError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::App(app) => app,
            ClientError::Decode(e) => e.into(),
            other => {
                let code = other.code();
                if matches!(code.category(), shared::error::ErrorCategory::System) {
                    tracing::error!(code = %code, error = %other, "Client error");
                }
                AppError::with_message(code, other.to_string())
            }
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
