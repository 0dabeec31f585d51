//! Canteen Client - menu browsing and voting against the hosted backend
//!
//! Keeps a local copy of a canteen's menu in sync with the backend, casts
//! votes, and derives the filtered/sorted view shown to the user.

pub mod backend;
pub mod bids;
pub mod config;
pub mod controller;
pub mod error;
pub mod feed;
pub mod identity;
pub mod logger;
pub mod notify;
pub mod projection;

pub use backend::{Backend, MemoryBackend, RestBackend};
pub use bids::{NotificationSender, send_notification};
pub use config::{ClientConfig, NoticeConfig};
pub use controller::{CanteenController, VoteOutcome};
pub use error::{ClientError, ClientResult};
pub use feed::{ChangeFeed, FeedHub, Subscription};
pub use identity::{Identity, Session};
pub use notify::{ChannelNotifier, Notifier, TracingNotifier};
pub use projection::{CategoryGroup, Selection, SortKey, group_by_category, project};

// Re-export shared types for convenience
pub use shared::message::{Notice, NoticeLevel, NoticePosition, RowChange};
pub use shared::models::{Canteen, MenuItem, VoteDirection};
