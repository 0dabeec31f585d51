//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// No signed-in user; the caller has been sent to the sign-in route
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The backend rejected or failed a read/write
    #[error("Backend error ({code}): {message}", code = .0.code, message = .0.message)]
    Backend(#[from] AppError),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    /// Shared error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::AuthenticationRequired => ErrorCode::NotAuthenticated,
            Self::Backend(e) => e.code,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Http(_) => ErrorCode::NetworkError,
            Self::InvalidResponse(_) | Self::Serialization(_) => ErrorCode::InvalidFormat,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Whether the error means the requested row does not exist
    pub fn is_not_found(&self) -> bool {
        self.code().is_not_found()
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
