//! Backend data service
//!
//! The query surface the client needs from the hosted backend. Two
//! implementations ship with the crate:
//!
//! - [`MemoryBackend`]: in-process tables with a [`FeedHub`](crate::feed::FeedHub)
//!   change feed, used by tests and local runs
//! - [`RestBackend`]: the hosted REST API

mod memory;
mod rest;

pub use memory::{MemoryBackend, StoredNotification};
pub use rest::RestBackend;

use async_trait::async_trait;
use shared::models::{Canteen, MenuItem, NewNotification, VoteState, VoteUpdate};

use crate::error::ClientResult;

#[async_trait]
pub trait Backend: Send + Sync {
    /// Every canteen, in backend order
    async fn list_canteens(&self) -> ClientResult<Vec<Canteen>>;

    /// Every menu item of one canteen, in backend order
    async fn list_menu_items(&self, canteen_id: &str) -> ClientResult<Vec<MenuItem>>;

    /// Raw category labels of one canteen's items (may repeat or be empty)
    async fn list_category_labels(&self, canteen_id: &str) -> ClientResult<Vec<String>>;

    /// Vote columns of a single item; missing item is a not-found error
    async fn fetch_vote_state(&self, item_id: &str) -> ClientResult<VoteState>;

    /// Write the vote columns of a single item and return the updated row
    async fn apply_vote(&self, item_id: &str, update: &VoteUpdate) -> ClientResult<MenuItem>;

    /// Store a marketplace notification
    async fn insert_notification(&self, notification: &NewNotification) -> ClientResult<()>;
}
