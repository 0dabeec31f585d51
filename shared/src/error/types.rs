//! Application error type

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Backend failures are reported through this type so that callers can
/// branch on the [`ErrorCode`] while still carrying whatever the backend
/// said (hint, native error code) in `details`.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a detail entry
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref().and_then(|d| d.get(key))
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// Menu item with the given id does not exist
    pub fn menu_item_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {} not found", id))
            .with_detail("id", id)
    }

    /// Canteen with the given id does not exist
    pub fn canteen_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(ErrorCode::CanteenNotFound, format!("Canteen {} not found", id))
            .with_detail("id", id)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a backend read error
    pub fn backend_read(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BackendReadFailed, msg)
    }

    /// Create a backend write error
    pub fn backend_write(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::BackendWriteFailed, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }
}

impl From<ErrorCode> for AppError {
    fn from(code: ErrorCode) -> Self {
        Self::new(code)
    }
}

/// Result alias for operations returning [`AppError`]
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_default_message() {
        let err = AppError::new(ErrorCode::NotAuthenticated);
        assert_eq!(err.message, "Authentication required");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_details_accumulate() {
        let err = AppError::backend_write("update rejected")
            .with_detail("hint", "check row level security")
            .with_detail("native_code", "42501");

        assert_eq!(err.code, ErrorCode::BackendWriteFailed);
        assert_eq!(err.to_string(), "update rejected");
        assert_eq!(
            err.detail("native_code"),
            Some(&Value::String("42501".into()))
        );
    }

    #[test]
    fn test_menu_item_not_found_carries_id() {
        let err = AppError::menu_item_not_found("item-9");
        assert!(err.code.is_not_found());
        assert_eq!(err.detail("id"), Some(&Value::String("item-9".into())));
    }
}
