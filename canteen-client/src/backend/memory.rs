//! In-process backend
//!
//! Holds the tables in memory and publishes every menu item mutation on a
//! [`FeedHub`], the same way the hosted backend pushes row changes. Reads
//! and writes can be made to fail on demand.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use shared::error::AppError;
use shared::message::RowChange;
use shared::models::{Canteen, MenuItem, NewNotification, VoteState, VoteUpdate};
use tokio::sync::broadcast;
use uuid::Uuid;

use super::Backend;
use crate::error::ClientResult;
use crate::feed::{ChangeFeed, FeedHub};

/// A notification row as stored
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNotification {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub notification: NewNotification,
}

#[derive(Debug, Default)]
struct Tables {
    canteens: Vec<Canteen>,
    menu_items: Vec<MenuItem>,
    notifications: Vec<StoredNotification>,
}

#[derive(Debug, Default)]
struct Faults {
    reads: AtomicBool,
    writes: AtomicBool,
}

/// In-memory tables plus change feed. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<Tables>>,
    feed: FeedHub,
    faults: Arc<Faults>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish changes on an existing hub
    pub fn with_feed(feed: FeedHub) -> Self {
        Self {
            feed,
            ..Self::default()
        }
    }

    pub fn feed(&self) -> &FeedHub {
        &self.feed
    }

    pub fn insert_canteen(&self, canteen: Canteen) {
        self.tables.write().canteens.push(canteen);
    }

    /// Insert or replace an item; publishes an INSERT for new rows
    pub fn insert_menu_item(&self, item: MenuItem) {
        let change = {
            let mut tables = self.tables.write();
            match tables.menu_items.iter_mut().find(|i| i.id == item.id) {
                Some(existing) => {
                    let old = std::mem::replace(existing, item.clone());
                    RowChange::update(old, item)
                }
                None => {
                    tables.menu_items.push(item.clone());
                    RowChange::insert(item)
                }
            }
        };
        self.feed.publish(change);
    }

    /// Delete an item; publishes a DELETE when it existed
    pub fn remove_menu_item(&self, item_id: &str) -> Option<MenuItem> {
        let removed = {
            let mut tables = self.tables.write();
            let index = tables.menu_items.iter().position(|i| i.id == item_id)?;
            tables.menu_items.remove(index)
        };
        self.feed.publish(RowChange::delete(removed.clone()));
        Some(removed)
    }

    pub fn menu_item(&self, item_id: &str) -> Option<MenuItem> {
        self.tables
            .read()
            .menu_items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
    }

    pub fn notifications(&self) -> Vec<StoredNotification> {
        self.tables.read().notifications.clone()
    }

    /// Make every subsequent read fail until reset
    pub fn fail_reads(&self, fail: bool) {
        self.faults.reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent write fail until reset
    pub fn fail_writes(&self, fail: bool) {
        self.faults.writes.store(fail, Ordering::SeqCst);
    }

    fn check_read(&self, table: &str) -> ClientResult<()> {
        if self.faults.reads.load(Ordering::SeqCst) {
            return Err(AppError::backend_read(format!("simulated read failure on {table}"))
                .with_detail("table", table)
                .into());
        }
        Ok(())
    }

    fn check_write(&self, table: &str) -> ClientResult<()> {
        if self.faults.writes.load(Ordering::SeqCst) {
            return Err(AppError::backend_write(format!("simulated write failure on {table}"))
                .with_detail("table", table)
                .into());
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_canteens(&self) -> ClientResult<Vec<Canteen>> {
        self.check_read("canteens")?;
        Ok(self.tables.read().canteens.clone())
    }

    async fn list_menu_items(&self, canteen_id: &str) -> ClientResult<Vec<MenuItem>> {
        self.check_read("menu_items")?;
        Ok(self
            .tables
            .read()
            .menu_items
            .iter()
            .filter(|i| i.canteen_id == canteen_id)
            .cloned()
            .collect())
    }

    async fn list_category_labels(&self, canteen_id: &str) -> ClientResult<Vec<String>> {
        self.check_read("menu_items")?;
        Ok(self
            .tables
            .read()
            .menu_items
            .iter()
            .filter(|i| i.canteen_id == canteen_id)
            .map(|i| i.category.clone())
            .collect())
    }

    async fn fetch_vote_state(&self, item_id: &str) -> ClientResult<VoteState> {
        self.check_read("menu_items")?;
        self.menu_item(item_id)
            .map(|item| VoteState::from(&item))
            .ok_or_else(|| AppError::menu_item_not_found(item_id).into())
    }

    async fn apply_vote(&self, item_id: &str, update: &VoteUpdate) -> ClientResult<MenuItem> {
        self.check_write("menu_items")?;
        let (old, new) = {
            let mut tables = self.tables.write();
            let item = tables
                .menu_items
                .iter_mut()
                .find(|i| i.id == item_id)
                .ok_or_else(|| AppError::menu_item_not_found(item_id))?;
            let old = item.clone();
            update.apply_to(item);
            (old, item.clone())
        };

        tracing::debug!(item_id, votes = update.votes, voter = %update.last_voter, "Vote stored");
        self.feed.publish(RowChange::update(old, new.clone()));
        Ok(new)
    }

    async fn insert_notification(&self, notification: &NewNotification) -> ClientResult<()> {
        self.check_write("notifications")?;
        self.tables.write().notifications.push(StoredNotification {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            notification: notification.clone(),
        });
        Ok(())
    }
}

impl ChangeFeed for MemoryBackend {
    fn subscribe_menu_items(&self) -> broadcast::Receiver<RowChange<MenuItem>> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use shared::error::ErrorCode;
    use shared::message::ChangeKind;
    use shared::models::VoteDirection;

    fn item(id: &str, canteen: &str, category: &str) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: format!("Item {id}"),
            price: Decimal::new(50, 0),
            category: category.into(),
            is_nonveg: false,
            votes: None,
            canteen_id: canteen.into(),
            curator_rating: None,
            last_voter: None,
            last_vote_type: None,
            last_vote_timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_items_are_scoped_by_canteen() {
        let backend = MemoryBackend::new();
        backend.insert_menu_item(item("a", "c1", "Rolls"));
        backend.insert_menu_item(item("b", "c2", "Drinks"));
        backend.insert_menu_item(item("c", "c1", ""));

        let items = backend.list_menu_items("c1").await.unwrap();
        assert_eq!(items.iter().map(|i| i.id.as_str()).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(
            backend.list_category_labels("c1").await.unwrap(),
            vec!["Rolls".to_string(), String::new()]
        );
    }

    #[tokio::test]
    async fn test_apply_vote_publishes_update() {
        let backend = MemoryBackend::new();
        backend.insert_menu_item(item("a", "c1", "Rolls"));
        let mut rx = backend.subscribe_menu_items();

        let update = VoteUpdate {
            votes: 1,
            last_voter: "Bob".into(),
            last_vote_type: VoteDirection::Up,
            last_vote_timestamp: Utc::now(),
        };
        let row = backend.apply_vote("a", &update).await.unwrap();
        assert_eq!(row.votes, Some(1));

        let change = rx.recv().await.unwrap();
        assert_eq!(change.kind, ChangeKind::Update);
        let (old, new) = change.as_update().unwrap();
        assert_eq!(old.votes, None);
        assert_eq!(new.last_voter.as_deref(), Some("Bob"));
    }

    #[tokio::test]
    async fn test_missing_item_and_faults() {
        let backend = MemoryBackend::new();
        let err = backend.fetch_vote_state("nope").await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::MenuItemNotFound);

        backend.fail_reads(true);
        let err = backend.list_canteens().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::BackendReadFailed);
        backend.fail_reads(false);
        assert!(backend.list_canteens().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_publishes_delete() {
        let backend = MemoryBackend::new();
        backend.insert_menu_item(item("a", "c1", "Rolls"));
        let mut rx = backend.subscribe_menu_items();

        assert!(backend.remove_menu_item("a").is_some());
        assert!(backend.remove_menu_item("a").is_none());
        assert_eq!(rx.recv().await.unwrap().kind, ChangeKind::Delete);
    }
}
