//! Data models
//!
//! Mirrors of the hosted backend's tables. Ids are the backend's string
//! primary keys.

pub mod canteen;
pub mod menu_item;
pub mod notification;
pub mod vote;

// Re-exports
pub use canteen::*;
pub use menu_item::*;
pub use notification::*;
pub use vote::*;
