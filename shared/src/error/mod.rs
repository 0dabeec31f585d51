//! Unified error system
//!
//! - [`ErrorCode`]: standardized error codes
//! - [`ErrorCategory`]: classification of codes by domain
//! - [`AppError`]: error value with code, message and details
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::backend_read("connection reset")
//!     .with_detail("table", "menu_items");
//! assert_eq!(err.code, ErrorCode::BackendReadFailed);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
