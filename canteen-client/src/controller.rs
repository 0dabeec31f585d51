//! Canteen menu controller
//!
//! Owns the local copies of canteens and menu items, casts votes through the
//! [`Backend`], and keeps one change-feed [`Subscription`] alive that patches
//! vote counts and announces other users' activity.
//!
//! ```text
//!   cast_vote ──► Backend (read, decide, write) ──► local patch + notice
//!                        │
//!                        ▼ row UPDATE
//!   ChangeFeed ──► Subscription ──► local patch (selected canteen only)
//!                                └► activity notice (any canteen)
//! ```
//!
//! All view state lives behind one [`parking_lot::Mutex`] that is never held
//! across an await point. The visible projection is recomputed on every
//! mutation of items or [`Selection`].

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use shared::error::AppError;
use shared::message::{Notice, RowChange};
use shared::models::{
    Canteen, MenuItem, VoteDecision, VoteDirection, distinct_categories, sort_by_name,
};
use shared::util::first_name;

use crate::backend::Backend;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::feed::{ChangeFeed, Subscription};
use crate::identity::Identity;
use crate::notify::Notifier;
use crate::projection::{CategoryGroup, Selection, SortKey, group_by_category, project};

const SUBSCRIPTION_NAME: &str = "menu-votes-all-canteens";
const UNKNOWN_CANTEEN: &str = "Unknown Canteen";

const MSG_LOGIN_REQUIRED: &str = "You need to be logged in to vote";
const MSG_DUPLICATE_VOTE: &str = "Calm down, my guy";
const MSG_VOTE_FAILED: &str = "Failed to register your vote. Please try again.";
const MSG_CANTEENS_FAILED: &str = "Failed to load canteens";
const MSG_MENU_FAILED: &str = "Failed to load the menu";

/// Result of a vote that reached the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Applied {
        item_id: String,
        item_name: String,
        direction: VoteDirection,
        votes: i64,
    },
    /// Same voter, same direction as the last recorded vote
    DuplicateSuppressed,
}

#[derive(Debug, Default)]
struct ViewState {
    canteens: Vec<Canteen>,
    canteen_names: Arc<HashMap<String, String>>,
    selected: Option<String>,
    items: Vec<MenuItem>,
    categories: Vec<String>,
    selection: Selection,
    visible: Vec<MenuItem>,
}

impl ViewState {
    fn refresh(&mut self) {
        self.visible = project(&self.items, &self.selection);
    }

    fn set_votes(&mut self, item_id: &str, votes: Option<i64>) -> bool {
        match self.items.iter_mut().find(|i| i.id == item_id) {
            Some(item) if item.votes != votes => {
                item.votes = votes;
                self.refresh();
                true
            }
            _ => false,
        }
    }
}

/// What the feed handler needs, captured when the subscription starts
struct FeedContext {
    selected: Option<String>,
    canteen_names: Arc<HashMap<String, String>>,
    state: Arc<Mutex<ViewState>>,
    identity: Arc<dyn Identity>,
    notifier: Arc<dyn Notifier>,
    config: ClientConfig,
}

impl FeedContext {
    fn handle(&self, change: RowChange<MenuItem>) {
        let Some((_, updated)) = change.as_update() else {
            tracing::trace!(kind = ?change.kind, "Ignoring non-update change");
            return;
        };

        if self.selected.as_deref() == Some(updated.canteen_id.as_str())
            && self.state.lock().set_votes(&updated.id, updated.votes)
        {
            tracing::debug!(item_id = %updated.id, votes = ?updated.votes, "Vote count patched from feed");
        }

        let current_user = self
            .identity
            .display_name()
            .unwrap_or_else(|| self.config.anonymous_name.clone());

        if let Some(voter) = updated.last_voter.as_deref()
            && !voter.is_empty()
            && voter != current_user
        {
            let canteen = self
                .canteen_names
                .get(&updated.canteen_id)
                .map(String::as_str)
                .unwrap_or(UNKNOWN_CANTEEN);
            let direction = updated.last_vote_type.unwrap_or(VoteDirection::Down);
            let message = format!(
                "{} {} {} at {}",
                first_name(voter),
                direction.as_str(),
                updated.name,
                canteen
            );
            let notices = &self.config.notices;
            self.notifier.notify(
                Notice::info(message)
                    .at(notices.position)
                    .lasting(notices.activity_duration),
            );
        }
    }
}

/// Menu browsing and voting for one user
pub struct CanteenController {
    backend: Arc<dyn Backend>,
    feed: Arc<dyn ChangeFeed>,
    identity: Arc<dyn Identity>,
    notifier: Arc<dyn Notifier>,
    config: ClientConfig,
    state: Arc<Mutex<ViewState>>,
    subscription: tokio::sync::Mutex<Option<Subscription>>,
}

impl CanteenController {
    pub fn new(
        backend: Arc<dyn Backend>,
        feed: Arc<dyn ChangeFeed>,
        identity: Arc<dyn Identity>,
        notifier: Arc<dyn Notifier>,
        config: ClientConfig,
    ) -> Self {
        Self {
            backend,
            feed,
            identity,
            notifier,
            config,
            state: Arc::new(Mutex::new(ViewState::default())),
            subscription: tokio::sync::Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    // ========== Canteens ==========

    /// Fetch every canteen, sorted by name, and rebuild the id to name map
    pub async fn load_canteens(&self) -> ClientResult<Vec<Canteen>> {
        let mut canteens = match self.backend.list_canteens().await {
            Ok(canteens) => canteens,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load canteens");
                self.notify_error(MSG_CANTEENS_FAILED);
                return Err(e);
            }
        };
        sort_by_name(&mut canteens);

        let names: HashMap<String, String> = canteens
            .iter()
            .map(|c| (c.id.clone(), c.name.clone()))
            .collect();
        {
            let mut state = self.state.lock();
            state.canteens = canteens.clone();
            state.canteen_names = Arc::new(names);
        }
        tracing::info!(count = canteens.len(), "Canteens loaded");

        self.resubscribe().await;
        Ok(canteens)
    }

    /// Switch to another canteen.
    ///
    /// Resets the selection and reloads categories and items. Load failures
    /// are reported through a notice and leave an empty menu.
    pub async fn select_canteen(&self, canteen_id: &str) -> ClientResult<()> {
        {
            let mut state = self.state.lock();
            if !state.canteens.iter().any(|c| c.id == canteen_id) {
                tracing::error!(canteen_id, "Canteen data not found");
                return Err(AppError::canteen_not_found(canteen_id).into());
            }
            state.selected = Some(canteen_id.to_string());
            state.selection = Selection::default();
            state.items.clear();
            state.categories.clear();
            state.refresh();
        }
        tracing::info!(canteen_id, "Canteen selected");

        // Subscribe before loading so no update between load and subscribe is lost
        self.resubscribe().await;

        match self.backend.list_category_labels(canteen_id).await {
            Ok(labels) => {
                let categories = distinct_categories(labels.iter().map(String::as_str));
                let mut state = self.state.lock();
                if state.selected.as_deref() == Some(canteen_id) {
                    state.categories = categories;
                }
            }
            Err(e) => {
                tracing::error!(canteen_id, error = %e, "Failed to load categories");
                self.notify_error(MSG_MENU_FAILED);
            }
        }

        match self.backend.list_menu_items(canteen_id).await {
            Ok(items) => {
                tracing::debug!(canteen_id, count = items.len(), "Menu items loaded");
                let mut state = self.state.lock();
                if state.selected.as_deref() == Some(canteen_id) {
                    state.items = items;
                    state.refresh();
                }
            }
            Err(e) => {
                tracing::error!(canteen_id, error = %e, "Failed to load menu items");
                self.notify_error(MSG_MENU_FAILED);
            }
        }

        Ok(())
    }

    // ========== Voting ==========

    /// Cast an up or down vote on an item as the signed-in user
    pub async fn cast_vote(
        &self,
        item_id: &str,
        direction: VoteDirection,
    ) -> ClientResult<VoteOutcome> {
        let Some(voter) = self.identity.display_name() else {
            tracing::warn!(item_id, "Vote attempted without signing in");
            self.notify_error(MSG_LOGIN_REQUIRED);
            self.identity.redirect_to_sign_in(&self.config.sign_in_route);
            return Err(ClientError::AuthenticationRequired);
        };

        let outcome = match self.submit_vote(item_id, &voter, direction).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(item_id, voter = %voter, %direction, error = %e, "Error updating votes");
                self.notify_error(MSG_VOTE_FAILED);
                return Err(e);
            }
        };

        match &outcome {
            VoteOutcome::DuplicateSuppressed => {
                tracing::debug!(item_id, voter = %voter, %direction, "Duplicate vote suppressed");
                self.notify_vote(Notice::warning(MSG_DUPLICATE_VOTE));
            }
            VoteOutcome::Applied {
                item_name, votes, ..
            } => {
                self.state.lock().set_votes(item_id, Some(*votes));
                tracing::info!(item_id, voter = %voter, %direction, votes, "Vote registered");
                self.notify_vote(Notice::success(format!(
                    "You {} \"{}\"",
                    direction.past_tense(),
                    item_name
                )));
            }
        }
        Ok(outcome)
    }

    async fn submit_vote(
        &self,
        item_id: &str,
        voter: &str,
        direction: VoteDirection,
    ) -> ClientResult<VoteOutcome> {
        let current = self.backend.fetch_vote_state(item_id).await?;
        let update = match current.decide(voter, direction, Utc::now()) {
            VoteDecision::Suppressed => return Ok(VoteOutcome::DuplicateSuppressed),
            VoteDecision::Apply(update) => update,
        };

        let stored = self.backend.apply_vote(item_id, &update).await?;
        Ok(VoteOutcome::Applied {
            item_id: item_id.to_string(),
            item_name: current.name,
            direction,
            votes: stored.votes.unwrap_or(update.votes),
        })
    }

    // ========== Selection ==========

    pub fn set_search(&self, search: impl Into<String>) {
        self.update_selection(|s| s.search = search.into());
    }

    pub fn toggle_category(&self, category: &str) {
        self.update_selection(|s| s.toggle_category(category));
    }

    pub fn set_categories(&self, categories: Vec<String>) {
        self.update_selection(|s| s.categories = categories);
    }

    pub fn set_veg(&self, veg: bool) {
        self.update_selection(|s| s.veg = veg);
    }

    pub fn set_non_veg(&self, non_veg: bool) {
        self.update_selection(|s| s.non_veg = non_veg);
    }

    pub fn set_sort(&self, sort: SortKey) {
        self.update_selection(|s| s.sort = sort);
    }

    fn update_selection(&self, change: impl FnOnce(&mut Selection)) {
        let mut state = self.state.lock();
        change(&mut state.selection);
        state.refresh();
    }

    // ========== Views ==========

    /// Items after filtering and sorting
    pub fn visible(&self) -> Vec<MenuItem> {
        self.state.lock().visible.clone()
    }

    /// Visible items grouped by category
    pub fn grouped(&self) -> Vec<CategoryGroup> {
        group_by_category(&self.state.lock().visible)
    }

    /// No item passes the current filters
    pub fn is_empty_view(&self) -> bool {
        self.state.lock().visible.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.state.lock().selection.clone()
    }

    /// Raw items of the selected canteen, in backend order
    pub fn items(&self) -> Vec<MenuItem> {
        self.state.lock().items.clone()
    }

    pub fn item(&self, item_id: &str) -> Option<MenuItem> {
        self.state
            .lock()
            .items
            .iter()
            .find(|i| i.id == item_id)
            .cloned()
    }

    /// Distinct non-empty categories of the selected canteen
    pub fn categories(&self) -> Vec<String> {
        self.state.lock().categories.clone()
    }

    pub fn canteens(&self) -> Vec<Canteen> {
        self.state.lock().canteens.clone()
    }

    pub fn selected_canteen(&self) -> Option<Canteen> {
        let state = self.state.lock();
        let id = state.selected.as_deref()?;
        state.canteens.iter().find(|c| c.id == id).cloned()
    }

    // ========== Subscription ==========

    /// Replace the change-feed subscription.
    ///
    /// The old subscription is fully stopped before the new one starts.
    async fn resubscribe(&self) {
        let mut slot = self.subscription.lock().await;
        if let Some(old) = slot.take() {
            old.unsubscribe().await;
        }

        let context = {
            let state = self.state.lock();
            FeedContext {
                selected: state.selected.clone(),
                canteen_names: state.canteen_names.clone(),
                state: self.state.clone(),
                identity: self.identity.clone(),
                notifier: self.notifier.clone(),
                config: self.config.clone(),
            }
        };
        tracing::debug!(selected = ?context.selected, "Subscribing to menu item changes");

        let rx = self.feed.subscribe_menu_items();
        *slot = Some(Subscription::spawn(SUBSCRIPTION_NAME, rx, move |change| {
            context.handle(change)
        }));
    }

    /// Whether a change-feed subscription is running
    pub async fn is_subscribed(&self) -> bool {
        self.subscription
            .lock()
            .await
            .as_ref()
            .is_some_and(Subscription::is_active)
    }

    /// Stop the change-feed subscription
    pub async fn close(&self) {
        if let Some(subscription) = self.subscription.lock().await.take() {
            subscription.unsubscribe().await;
            tracing::debug!("Controller closed");
        }
    }

    // ========== Notices ==========

    fn notify_vote(&self, notice: Notice) {
        let notices = &self.config.notices;
        self.notifier
            .notify(notice.at(notices.position).lasting(notices.vote_duration));
    }

    fn notify_error(&self, message: &str) {
        self.notifier
            .notify(Notice::error(message).at(self.config.notices.position));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::identity::Session;
    use crate::notify::ChannelNotifier;
    use rust_decimal::Decimal;
    use shared::message::NoticeLevel;

    fn item(id: &str, canteen: &str, votes: Option<i64>) -> MenuItem {
        MenuItem {
            id: id.into(),
            name: format!("Item {id}"),
            price: Decimal::new(40, 0),
            category: "Snacks".into(),
            is_nonveg: false,
            votes,
            canteen_id: canteen.into(),
            curator_rating: None,
            last_voter: None,
            last_vote_type: None,
            last_vote_timestamp: None,
        }
    }

    fn context(selected: Option<&str>) -> (FeedContext, tokio::sync::mpsc::UnboundedReceiver<Notice>) {
        let (notifier, rx) = ChannelNotifier::new();
        let mut names = HashMap::new();
        names.insert("c1".to_string(), "Main Canteen".to_string());
        let state = ViewState {
            items: vec![item("a", "c1", Some(1))],
            ..Default::default()
        };
        let ctx = FeedContext {
            selected: selected.map(String::from),
            canteen_names: Arc::new(names),
            state: Arc::new(Mutex::new(state)),
            identity: Arc::new(Session::signed_in("Alice Rao")),
            notifier: Arc::new(notifier),
            config: ClientConfig::default(),
        };
        (ctx, rx)
    }

    fn voted(old: &MenuItem, voter: &str, votes: i64) -> RowChange<MenuItem> {
        let mut new = old.clone();
        new.votes = Some(votes);
        new.last_voter = Some(voter.to_string());
        new.last_vote_type = Some(VoteDirection::Up);
        RowChange::update(old.clone(), new)
    }

    #[test]
    fn test_feed_patches_selected_canteen_and_announces() {
        let (ctx, mut rx) = context(Some("c1"));
        ctx.handle(voted(&item("a", "c1", Some(1)), "Bob Iyer", 2));

        assert_eq!(ctx.state.lock().items[0].votes, Some(2));
        let notice = rx.try_recv().unwrap();
        assert_eq!(notice.level, NoticeLevel::Info);
        assert_eq!(notice.message, "Bob liked Item a at Main Canteen");
        assert_eq!(notice.duration(), ctx.config.notices.activity_duration);
    }

    #[test]
    fn test_feed_skips_own_votes_and_other_kinds() {
        let (ctx, mut rx) = context(Some("c1"));
        ctx.handle(voted(&item("a", "c1", Some(1)), "Alice Rao", 2));
        ctx.handle(RowChange::insert(item("b", "c1", None)));

        // Own vote still patches the count but is not announced
        assert_eq!(ctx.state.lock().items[0].votes, Some(2));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_feed_unknown_canteen_name() {
        let (ctx, mut rx) = context(None);
        ctx.handle(voted(&item("z", "c9", None), "Chen", 1));
        assert_eq!(rx.try_recv().unwrap().message, "Chen liked Item z at Unknown Canteen");
    }

    #[tokio::test]
    async fn test_unknown_canteen_is_not_found() {
        let backend = Arc::new(MemoryBackend::new());
        let (notifier, _rx) = ChannelNotifier::new();
        let controller = CanteenController::new(
            backend.clone(),
            backend,
            Arc::new(Session::new()),
            Arc::new(notifier),
            ClientConfig::default(),
        );

        let err = controller.select_canteen("missing").await.unwrap_err();
        assert!(err.is_not_found());
        assert!(controller.selected_canteen().is_none());
        controller.close().await;
    }
}
