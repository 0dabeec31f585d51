//! Change feed
//!
//! ```text
//!  backend write ──▶ FeedHub::publish ──▶ broadcast::Sender<RowChange<MenuItem>>
//!                                                   │
//!                                  ┌────────────────┼────────────────┐
//!                                  ▼                ▼                ▼
//!                            Subscription     Subscription     Subscription
//!                            (one per view, owns its task and cancel token)
//! ```

mod hub;
mod subscription;

pub use hub::{DEFAULT_FEED_CAPACITY, FeedHub};
pub use subscription::Subscription;

use shared::message::RowChange;
use shared::models::MenuItem;
use tokio::sync::broadcast;

/// Push source of menu item row changes.
///
/// Dropping the returned receiver cancels delivery to it.
pub trait ChangeFeed: Send + Sync {
    fn subscribe_menu_items(&self) -> broadcast::Receiver<RowChange<MenuItem>>;
}
