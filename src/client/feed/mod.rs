//! Feed Cache Reconciler
//!
//! Keeps a client-side card feed in step with the server's card change
//! stream. The owning view seeds the feed from its own one-shot fetch and
//! activates the reconciler with a change stream (usually
//! `ApiClient::card_changes`). From then on every delivered event is
//! merged into the cached entry. The reconciler never reads the card
//! store itself.
//!
//! # Lifecycle
//!
//! - `activate` opens exactly one subscription; activating again releases
//!   the previous one first
//! - `pump` applies whatever has been delivered so far without waiting,
//!   suited to a UI frame loop
//! - `next_change` waits for one event and applies it
//! - `deactivate` (or dropping the reconciler) releases the subscription
//!   and tears down the cache entry
//!
//! Merges are idempotent, so events replayed after a transport reconnect
//! do not duplicate or reorder cards.

pub mod cache;
pub mod reconcile;
pub mod subscription;

pub use cache::{FeedCache, FeedKey};
pub use reconcile::{apply_change, apply_delete, apply_insert, apply_update};
pub use subscription::FeedSubscription;

use futures_util::Stream;

use crate::shared::{CardChange, CardRecord};

/// One view's feed plus its live subscription
#[derive(Debug)]
pub struct FeedReconciler {
    key: FeedKey,
    cache: FeedCache,
    subscription: Option<FeedSubscription>,
}

impl FeedReconciler {
    pub fn new(key: FeedKey) -> Self {
        Self {
            key,
            cache: FeedCache::new(),
            subscription: None,
        }
    }

    pub fn key(&self) -> FeedKey {
        self.key
    }

    /// Populate the feed from the view's initial fetch
    pub fn seed(&mut self, records: Vec<CardRecord>) {
        self.cache.seed(self.key, records);
    }

    /// Subscribe to `changes`, replacing any previous subscription
    pub fn activate<S>(&mut self, changes: S)
    where
        S: Stream<Item = CardChange> + Send + 'static,
    {
        if let Some(mut previous) = self.subscription.take() {
            tracing::debug!("[Feed] Releasing previous subscription for {:?}", self.key);
            previous.release();
        }
        tracing::info!("[Feed] Subscribed to card changes for {:?}", self.key);
        self.subscription = Some(FeedSubscription::spawn(changes));
    }

    /// Apply every event delivered so far; returns how many were applied
    pub fn pump(&mut self) -> usize {
        let Some(subscription) = self.subscription.as_mut() else {
            return 0;
        };
        let mut applied = 0;
        while let Some(change) = subscription.try_next() {
            self.cache.merge(self.key, change);
            applied += 1;
        }
        applied
    }

    /// Wait for one event and apply it
    ///
    /// Returns the applied event, or `None` when inactive or the stream
    /// has ended.
    pub async fn next_change(&mut self) -> Option<CardChange> {
        let change = self.subscription.as_mut()?.next().await?;
        self.cache.merge(self.key, change.clone());
        Some(change)
    }

    /// Current feed, newest first; empty before seeding
    pub fn entries(&self) -> &[CardRecord] {
        self.cache.get(&self.key).unwrap_or(&[])
    }

    pub fn is_active(&self) -> bool {
        self.subscription
            .as_ref()
            .map(FeedSubscription::is_active)
            .unwrap_or(false)
    }

    /// Release the subscription and drop the cached feed
    pub fn deactivate(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
            tracing::info!("[Feed] Unsubscribed from card changes for {:?}", self.key);
        }
        self.cache.remove(&self.key);
    }
}

impl Drop for FeedReconciler {
    fn drop(&mut self) {
        if let Some(mut subscription) = self.subscription.take() {
            subscription.release();
        }
    }
}
