use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use shared::message::RowChange;

/// A live change-feed subscription.
///
/// Owns the task that drains the receiver. [`Subscription::unsubscribe`]
/// cancels and waits for the task; dropping the handle only cancels.
#[derive(Debug)]
pub struct Subscription {
    name: String,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Subscription {
    /// Start delivering changes from `rx` to `handler`.
    ///
    /// Changes are handled one at a time, in arrival order. Must be called
    /// inside a Tokio runtime.
    pub fn spawn<T, F>(
        name: impl Into<String>,
        mut rx: broadcast::Receiver<RowChange<T>>,
        mut handler: F,
    ) -> Self
    where
        T: Clone + Send + 'static,
        F: FnMut(RowChange<T>) + Send + 'static,
    {
        let name = name.into();
        let token = CancellationToken::new();

        let task_token = token.clone();
        let task_name = name.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = task_token.cancelled() => break,
                    received = rx.recv() => match received {
                        Ok(change) => handler(change),
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(subscription = %task_name, skipped, "Change feed lagged, events dropped");
                        }
                        Err(RecvError::Closed) => {
                            tracing::debug!(subscription = %task_name, "Change feed closed");
                            break;
                        }
                    },
                }
            }
            tracing::debug!(subscription = %task_name, "Subscription stopped");
        });

        tracing::debug!(subscription = %name, "Subscription started");
        Self {
            name,
            token,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the task is still delivering changes
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stop delivery and wait until the handler will not run again
    pub async fn unsubscribe(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take()
            && let Err(e) = handle.await
            && e.is_panic()
        {
            tracing::error!(subscription = %self.name, "Subscription handler panicked");
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_delivers_in_order() {
        let (tx, rx) = broadcast::channel::<RowChange<u32>>(16);
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();
        let sub = Subscription::spawn("test", rx, move |change| {
            let _ = seen_tx.send(change.new);
        });

        tx.send(RowChange::insert(1)).unwrap();
        tx.send(RowChange::update(1, 2)).unwrap();

        assert_eq!(seen_rx.recv().await.unwrap(), Some(1));
        assert_eq!(seen_rx.recv().await.unwrap(), Some(2));
        assert!(sub.is_active());
        sub.unsubscribe().await;
    }

    #[tokio::test]
    async fn test_no_delivery_after_unsubscribe() {
        let (tx, rx) = broadcast::channel::<RowChange<u32>>(16);
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let sub = Subscription::spawn("test", rx, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.unsubscribe().await;
        // The receiver was dropped with the task
        assert!(tx.send(RowChange::insert(1)).is_err());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_drop_cancels() {
        let (tx, rx) = broadcast::channel::<RowChange<u32>>(16);
        let sub = Subscription::spawn("test", rx, |_| {});
        drop(sub);

        for _ in 0..100 {
            if tx.receiver_count() == 0 {
                return;
            }
            tokio::task::yield_now().await;
        }
        panic!("subscription task kept its receiver after drop");
    }
}
