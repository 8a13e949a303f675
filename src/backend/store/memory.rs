/**
 * In-Memory Card Store
 *
 * Process-local card store used when no `DATABASE_URL` is configured and
 * throughout the test suite. It enforces the same rules as the Postgres
 * schema: unique slugs, immutable slugs and monotonic `read_at`.
 *
 * Mutations made through `insert_card`, `update_card` and `delete_card`
 * are reported on the change broadcast, mirroring the database trigger.
 */

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use super::{CardStore, StoreError};
use crate::backend::realtime::broadcast_change;
use crate::shared::{CardChange, CardRecord, LikeNotification};

#[derive(Default)]
struct Tables {
    cards: HashMap<Uuid, CardRecord>,
    notifications: HashMap<Uuid, LikeNotification>,
}

/// Card store backed by in-process maps
#[derive(Default)]
pub struct MemoryCardStore {
    tables: RwLock<Tables>,
    changes: Option<broadcast::Sender<CardChange>>,
    read_delay_ms: AtomicU64,
    failing: AtomicBool,
}

impl MemoryCardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report mutations on `changes`
    pub fn with_changes(mut self, changes: broadcast::Sender<CardChange>) -> Self {
        self.changes = Some(changes);
        self
    }

    /// Delay every read by `delay`
    pub fn set_read_delay(&self, delay: Duration) {
        self.read_delay_ms
            .store(delay.as_millis() as u64, Ordering::Relaxed);
    }

    /// Make every call fail with `StoreError::Unavailable`
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }

    /// Insert a new card
    ///
    /// Fails with `Conflict` if the id or slug is already taken.
    pub async fn insert_card(&self, card: CardRecord) -> Result<CardRecord, StoreError> {
        self.check_available()?;
        {
            let mut tables = self.tables.write().await;
            if tables.cards.contains_key(&card.id) {
                return Err(StoreError::conflict(format!("card {} already exists", card.id)));
            }
            if tables.cards.values().any(|c| c.slug == card.slug) {
                return Err(StoreError::conflict(format!("slug '{}' is taken", card.slug)));
            }
            tables.cards.insert(card.id, card.clone());
        }
        self.emit(CardChange::insert(card.clone()));
        Ok(card)
    }

    /// Replace an existing card
    ///
    /// The slug may not change once assigned.
    pub async fn update_card(&self, mut card: CardRecord) -> Result<CardRecord, StoreError> {
        self.check_available()?;
        {
            let mut tables = self.tables.write().await;
            let existing = tables
                .cards
                .get(&card.id)
                .ok_or_else(|| StoreError::conflict(format!("card {} does not exist", card.id)))?;
            if existing.slug != card.slug {
                return Err(StoreError::conflict("slug is immutable"));
            }
            card.created_at = existing.created_at;
            card.updated_at = Utc::now();
            tables.cards.insert(card.id, card.clone());
        }
        self.emit(CardChange::update(card.clone()));
        Ok(card)
    }

    /// Store a like notification
    pub async fn insert_notification(
        &self,
        notification: LikeNotification,
    ) -> Result<(), StoreError> {
        self.check_available()?;
        self.tables
            .write()
            .await
            .notifications
            .insert(notification.id, notification);
        Ok(())
    }

    /// Look up a notification by id
    pub async fn notification(&self, id: Uuid) -> Option<LikeNotification> {
        self.tables.read().await.notifications.get(&id).cloned()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::Relaxed) {
            return Err(StoreError::unavailable("memory store is set to fail"));
        }
        Ok(())
    }

    async fn before_read(&self) -> Result<(), StoreError> {
        let delay = self.read_delay_ms.load(Ordering::Relaxed);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        self.check_available()
    }

    fn emit(&self, change: CardChange) {
        if let Some(tx) = &self.changes {
            broadcast_change(tx, change);
        }
    }
}

fn newest_first(cards: &mut [CardRecord]) {
    cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl CardStore for MemoryCardStore {
    async fn card_by_slug(&self, slug: &str) -> Result<Option<CardRecord>, StoreError> {
        self.before_read().await?;
        let tables = self.tables.read().await;
        Ok(tables.cards.values().find(|c| c.slug == slug).cloned())
    }

    async fn card_by_id(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError> {
        self.before_read().await?;
        Ok(self.tables.read().await.cards.get(&id).cloned())
    }

    async fn cards_by_owner(&self, owner: Uuid) -> Result<Vec<CardRecord>, StoreError> {
        self.before_read().await?;
        let mut cards: Vec<CardRecord> = self
            .tables
            .read()
            .await
            .cards
            .values()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        newest_first(&mut cards);
        Ok(cards)
    }

    async fn recent_image_cards(&self, limit: usize) -> Result<Vec<CardRecord>, StoreError> {
        self.before_read().await?;
        let mut cards: Vec<CardRecord> = self
            .tables
            .read()
            .await
            .cards
            .values()
            .filter(|c| c.image_url.is_some())
            .cloned()
            .collect();
        newest_first(&mut cards);
        cards.truncate(limit);
        Ok(cards)
    }

    async fn delete_card(&self, id: Uuid, owner: Uuid) -> Result<u64, StoreError> {
        self.check_available()?;
        let removed = {
            let mut tables = self.tables.write().await;
            match tables.cards.get(&id) {
                Some(card) if card.user_id == owner => tables.cards.remove(&id).is_some(),
                _ => false,
            }
        };
        if !removed {
            return Ok(0);
        }
        self.emit(CardChange::delete(id));
        Ok(1)
    }

    async fn notifications_for(
        &self,
        recipient: Uuid,
        limit: usize,
    ) -> Result<Vec<LikeNotification>, StoreError> {
        self.before_read().await?;
        let mut rows: Vec<LikeNotification> = self
            .tables
            .read()
            .await
            .notifications
            .values()
            .filter(|n| n.user_id == recipient)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn unread_count(&self, recipient: Uuid) -> Result<u64, StoreError> {
        self.before_read().await?;
        let count = self
            .tables
            .read()
            .await
            .notifications
            .values()
            .filter(|n| n.user_id == recipient && n.is_unread())
            .count();
        Ok(count as u64)
    }

    async fn mark_read(
        &self,
        ids: &[Uuid],
        recipient: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        self.check_available()?;
        let mut tables = self.tables.write().await;
        let mut changed = 0;
        for id in ids {
            if let Some(n) = tables.notifications.get_mut(id) {
                if n.user_id == recipient && n.mark_read(at) {
                    changed += 1;
                }
            }
        }
        Ok(changed)
    }
}
