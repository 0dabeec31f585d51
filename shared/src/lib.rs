//! Shared types for the canteen client
//!
//! Data models mirrored from the hosted backend's tables, the unified
//! error codes, and the message types that travel on the change feed and
//! the notice channel.

pub mod error;
pub mod message;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use message::{ChangeKind, Notice, NoticeLevel, NoticePosition, RowChange};
