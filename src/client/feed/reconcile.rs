//! Pure feed reducers.
//!
//! Each reducer takes the current ordered feed by value and returns the
//! next one. Applying the same event twice yields the same feed, so
//! replays after a reconnect are harmless.

use uuid::Uuid;

use crate::shared::{CardChange, CardRecord};

fn position(feed: &[CardRecord], id: Uuid) -> Option<usize> {
    feed.iter().position(|card| card.id == id)
}

/// Prepend `record` unless a card with its id is already present
pub fn apply_insert(mut feed: Vec<CardRecord>, record: CardRecord) -> Vec<CardRecord> {
    if position(&feed, record.id).is_none() {
        feed.insert(0, record);
    }
    feed
}

/// Replace the matching card in place, or prepend it when absent
pub fn apply_update(mut feed: Vec<CardRecord>, record: CardRecord) -> Vec<CardRecord> {
    match position(&feed, record.id) {
        Some(index) => feed[index] = record,
        None => feed.insert(0, record),
    }
    feed
}

/// Remove the matching card; absent ids leave the feed untouched
pub fn apply_delete(mut feed: Vec<CardRecord>, id: Uuid) -> Vec<CardRecord> {
    if let Some(index) = position(&feed, id) {
        feed.remove(index);
    }
    feed
}

pub fn apply_change(feed: Vec<CardRecord>, change: CardChange) -> Vec<CardRecord> {
    match change {
        CardChange::Insert { record } => apply_insert(feed, record),
        CardChange::Update { record } => apply_update(feed, record),
        CardChange::Delete { old_record } => apply_delete(feed, old_record.id),
    }
}
