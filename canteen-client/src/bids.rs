//! Notifications for the mess-meal bid marketplace

use std::sync::Arc;

use shared::models::{NewNotification, NotificationData, NotificationKind, NotificationMessage};

use crate::backend::Backend;
use crate::error::ClientResult;

/// Stores marketplace notifications for other users
#[derive(Clone)]
pub struct NotificationSender {
    backend: Arc<dyn Backend>,
}

impl NotificationSender {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Store a notification for `user_id`. Failures are logged and returned.
    pub async fn send(
        &self,
        user_id: &str,
        kind: NotificationKind,
        content: NotificationMessage,
        data: NotificationData,
    ) -> ClientResult<()> {
        send_notification(self.backend.as_ref(), user_id, kind, content, data).await
    }
}

pub async fn send_notification(
    backend: &dyn Backend,
    user_id: &str,
    kind: NotificationKind,
    content: NotificationMessage,
    data: NotificationData,
) -> ClientResult<()> {
    let notification = NewNotification::new(user_id, kind, content, data);
    match backend.insert_notification(&notification).await {
        Ok(()) => {
            tracing::debug!(user_id, ?kind, title = %notification.title, "Notification sent");
            Ok(())
        }
        Err(e) => {
            tracing::error!(user_id, ?kind, error = %e, "Error sending notification");
            Err(e)
        }
    }
}
