//! Notice sinks
//!
//! Notices are fire-and-forget: a sink never blocks the caller and never
//! reports failure back.

use shared::message::{Notice, NoticeLevel};
use tokio::sync::mpsc;

/// Receives transient notices for display
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Forwards notices to an unbounded channel, e.g. a UI task
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    tx: mpsc::UnboundedSender<Notice>,
}

impl ChannelNotifier {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Notifier for ChannelNotifier {
    fn notify(&self, notice: Notice) {
        if self.tx.send(notice).is_err() {
            tracing::debug!("Notice receiver dropped");
        }
    }
}

/// Writes notices to the log; useful for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::error!(target: "notice", "{}", notice.message),
            NoticeLevel::Warning => tracing::warn!(target: "notice", "{}", notice.message),
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(target: "notice", level = %notice.level, "{}", notice.message)
            }
        }
    }
}
