//! Unified error codes for the canteen client
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 3xxx: Catalog errors (canteens, menu items)
//! - 4xxx: Vote errors
//! - 5xxx: Notification errors
//! - 9xxx: System errors (backend, network, configuration)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Represented as u16 values so they serialize compactly and can be shared
/// with the web frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not signed in
    NotAuthenticated = 1001,

    // ==================== 3xxx: Catalog ====================
    /// Canteen not found
    CanteenNotFound = 3001,
    /// Menu item not found
    MenuItemNotFound = 3002,

    // ==================== 4xxx: Vote ====================
    /// Vote could not be registered
    VoteFailed = 4001,

    // ==================== 5xxx: Notification ====================
    /// Notification could not be stored
    NotificationFailed = 5001,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Reading from the backend failed
    BackendReadFailed = 9101,
    /// Writing to the backend failed
    BackendWriteFailed = 9102,
    /// Network error
    NetworkError = 9103,
    /// Configuration error
    ConfigError = 9201,
}

impl ErrorCode {
    /// Numeric value of this code
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Default message for this code
    pub const fn message(&self) -> &'static str {
        match self {
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",

            ErrorCode::NotAuthenticated => "Authentication required",

            ErrorCode::CanteenNotFound => "Canteen not found",
            ErrorCode::MenuItemNotFound => "Menu item not found",

            ErrorCode::VoteFailed => "Failed to register your vote",

            ErrorCode::NotificationFailed => "Failed to send notification",

            ErrorCode::InternalError => "Internal error",
            ErrorCode::BackendReadFailed => "Failed to read from backend",
            ErrorCode::BackendWriteFailed => "Failed to write to backend",
            ErrorCode::NetworkError => "Network error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }

    /// Whether this code represents success
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Whether this is one of the "something is missing" codes
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            ErrorCode::NotFound | ErrorCode::CanteenNotFound | ErrorCode::MenuItemNotFound
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            1001 => Ok(ErrorCode::NotAuthenticated),
            3001 => Ok(ErrorCode::CanteenNotFound),
            3002 => Ok(ErrorCode::MenuItemNotFound),
            4001 => Ok(ErrorCode::VoteFailed),
            5001 => Ok(ErrorCode::NotificationFailed),
            9001 => Ok(ErrorCode::InternalError),
            9101 => Ok(ErrorCode::BackendReadFailed),
            9102 => Ok(ErrorCode::BackendWriteFailed),
            9103 => Ok(ErrorCode::NetworkError),
            9201 => Ok(ErrorCode::ConfigError),
            _ => Err(InvalidErrorCode(value)),
        }
    }
}
