use shared::message::RowChange;
use shared::models::MenuItem;
use tokio::sync::broadcast;

use super::ChangeFeed;

/// Default capacity of the broadcast channel
pub const DEFAULT_FEED_CAPACITY: usize = 1024;

/// In-process change feed for the `menu_items` table.
///
/// Cloning is cheap; every clone publishes to the same subscribers.
#[derive(Debug, Clone)]
pub struct FeedHub {
    tx: broadcast::Sender<RowChange<MenuItem>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FEED_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish a change to every live subscriber.
    ///
    /// Returns how many subscribers received it; zero is not an error.
    pub fn publish(&self, change: RowChange<MenuItem>) -> usize {
        let kind = change.kind;
        match self.tx.send(change) {
            Ok(receivers) => {
                tracing::trace!(%kind, receivers, "Published menu item change");
                receivers
            }
            Err(_) => {
                tracing::trace!(%kind, "Menu item change dropped, no subscribers");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RowChange<MenuItem>> {
        self.tx.subscribe()
    }

    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for FeedHub {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed for FeedHub {
    fn subscribe_menu_items(&self) -> broadcast::Receiver<RowChange<MenuItem>> {
        self.subscribe()
    }
}
