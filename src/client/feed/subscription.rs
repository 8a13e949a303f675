//! Scoped change-event subscription.
//!
//! A spawned task forwards the upstream change stream into a local queue.
//! Releasing the subscription aborts the task, which drops the upstream
//! stream and with it the underlying connection.

use futures_util::{Stream, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::shared::CardChange;

#[derive(Debug)]
pub struct FeedSubscription {
    task: Option<JoinHandle<()>>,
    rx: mpsc::UnboundedReceiver<CardChange>,
}

impl FeedSubscription {
    /// Start forwarding `stream`; must be called inside a tokio runtime
    pub fn spawn<S>(stream: S) -> Self
    where
        S: Stream<Item = CardChange> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut stream = Box::pin(stream);
            while let Some(change) = stream.next().await {
                if tx.send(change).is_err() {
                    break;
                }
            }
            tracing::debug!("[Feed] Upstream change stream finished");
        });
        Self {
            task: Some(task),
            rx,
        }
    }

    /// Next delivered event, without waiting
    pub fn try_next(&mut self) -> Option<CardChange> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next event; `None` once released and drained
    pub async fn next(&mut self) -> Option<CardChange> {
        self.rx.recv().await
    }

    /// True while the forwarding task is still running
    pub fn is_active(&self) -> bool {
        self.task
            .as_ref()
            .map(|task| !task.is_finished())
            .unwrap_or(false)
    }

    /// Stop forwarding. Events already queued stay readable.
    pub fn release(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.rx.close();
    }

    /// Release and wait until the upstream stream has been dropped
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    tracing::warn!("[Feed] Subscription task failed: {}", e);
                }
            }
        }
        self.rx.close();
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
