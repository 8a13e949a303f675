//! Keyed feed cache.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::reconcile::{apply_delete, apply_insert, apply_update};
use crate::shared::{CardChange, CardRecord};

/// Identifies one cached feed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeedKey {
    /// Public community feed, bounded to `limit` cards
    Community { limit: usize },
    /// Every card owned by `user_id`
    Owner { user_id: Uuid },
}

impl FeedKey {
    /// Maximum number of cards kept for this key
    pub fn capacity(&self) -> Option<usize> {
        match self {
            Self::Community { limit } => Some(*limit),
            Self::Owner { .. } => None,
        }
    }

    /// Whether `record` belongs in this feed
    pub fn admits(&self, record: &CardRecord) -> bool {
        match self {
            Self::Community { .. } => record.is_public(),
            Self::Owner { user_id } => record.user_id == *user_id,
        }
    }

    fn bound(&self, feed: &mut Vec<CardRecord>) {
        if let Some(capacity) = self.capacity() {
            feed.truncate(capacity);
        }
    }
}

/// Ordered, deduplicated card lists per `FeedKey`
#[derive(Debug, Default)]
pub struct FeedCache {
    entries: HashMap<FeedKey, Vec<CardRecord>>,
}

impl FeedCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `key` with an initial fetch result
    ///
    /// Duplicate ids keep their first occurrence; records the key does not
    /// admit are dropped.
    pub fn seed(&mut self, key: FeedKey, records: Vec<CardRecord>) {
        let mut seen = HashSet::new();
        let mut feed: Vec<CardRecord> = records
            .into_iter()
            .filter(|record| key.admits(record) && seen.insert(record.id))
            .collect();
        key.bound(&mut feed);
        self.entries.insert(key, feed);
    }

    /// Apply one change event to the entry for `key`
    ///
    /// An update that makes a cached card inadmissible removes it; an
    /// inadmissible insert is ignored.
    pub fn merge(&mut self, key: FeedKey, change: CardChange) {
        let entry = self.entries.entry(key).or_default();
        let feed = std::mem::take(entry);
        let mut next = match change {
            CardChange::Insert { record } if key.admits(&record) => apply_insert(feed, record),
            CardChange::Insert { .. } => feed,
            CardChange::Update { record } if key.admits(&record) => apply_update(feed, record),
            CardChange::Update { record } => apply_delete(feed, record.id),
            CardChange::Delete { old_record } => apply_delete(feed, old_record.id),
        };
        key.bound(&mut next);
        *entry = next;
    }

    pub fn get(&self, key: &FeedKey) -> Option<&[CardRecord]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Tear down the entry for `key`
    pub fn remove(&mut self, key: &FeedKey) -> Option<Vec<CardRecord>> {
        self.entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
