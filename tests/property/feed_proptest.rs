//! Property-based tests for the feed reducers and cache

use std::collections::HashSet;

use proptest::prelude::*;
use uuid::Uuid;

use devcard::client::feed::{apply_change, apply_delete, FeedCache, FeedKey};
use devcard::shared::{CardChange, CardRecord};

use crate::common::{draft_card, public_card};

const POOL: usize = 6;

fn pool_ids() -> Vec<Uuid> {
    (0..POOL as u128).map(|n| Uuid::from_u128(n + 1)).collect()
}

fn record(id: Uuid, public: bool, revision: u8) -> CardRecord {
    let owner = Uuid::from_u128(99);
    let mut card = if public {
        public_card(owner, &format!("c{}", revision))
    } else {
        draft_card(owner, &format!("c{}", revision))
    };
    card.id = id;
    card
}

fn change_strategy() -> impl Strategy<Value = CardChange> {
    (0..3u8, 0..POOL, any::<bool>(), any::<u8>()).prop_map(|(kind, slot, public, revision)| {
        let id = pool_ids()[slot];
        match kind {
            0 => CardChange::insert(record(id, public, revision)),
            1 => CardChange::update(record(id, public, revision)),
            _ => CardChange::delete(id),
        }
    })
}

fn ids(feed: &[CardRecord]) -> Vec<Uuid> {
    feed.iter().map(|c| c.id).collect()
}

proptest! {
    #[test]
    fn test_every_change_is_idempotent(
        history in prop::collection::vec(change_strategy(), 0..20),
        change in change_strategy(),
    ) {
        let feed = history.into_iter().fold(Vec::new(), apply_change);
        let once = apply_change(feed, change.clone());
        let twice = apply_change(once.clone(), change);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn test_feed_never_holds_duplicates(
        history in prop::collection::vec(change_strategy(), 0..40),
    ) {
        let feed = history.into_iter().fold(Vec::new(), apply_change);
        let unique: HashSet<Uuid> = feed.iter().map(|c| c.id).collect();
        prop_assert_eq!(unique.len(), feed.len());
    }

    #[test]
    fn test_delete_removes_exactly_one_id(
        history in prop::collection::vec(change_strategy(), 0..30),
        slot in 0..POOL,
    ) {
        let feed = history.into_iter().fold(Vec::new(), apply_change);
        let target = pool_ids()[slot];
        let expected: Vec<Uuid> = ids(&feed).into_iter().filter(|id| *id != target).collect();
        prop_assert_eq!(ids(&apply_delete(feed, target)), expected);
    }

    #[test]
    fn test_community_cache_stays_public_and_bounded(
        limit in 1usize..5,
        history in prop::collection::vec(change_strategy(), 0..40),
    ) {
        let key = FeedKey::Community { limit };
        let mut cache = FeedCache::new();
        cache.seed(key, Vec::new());
        for change in history {
            cache.merge(key, change);
        }
        let feed = cache.get(&key).unwrap();
        prop_assert!(feed.len() <= limit);
        prop_assert!(feed.iter().all(CardRecord::is_public));
    }

    #[test]
    fn test_replayed_history_converges(
        history in prop::collection::vec(change_strategy(), 0..20),
    ) {
        // A reconnect that replays the tail of the stream must not change the result
        let key = FeedKey::Owner { user_id: Uuid::from_u128(99) };
        let mut cache = FeedCache::new();
        for change in history.iter().cloned() {
            cache.merge(key, change);
        }
        let settled = cache.get(&key).map(<[CardRecord]>::to_vec);
        if let Some(last) = history.last().cloned() {
            cache.merge(key, last);
        }
        prop_assert_eq!(cache.get(&key).map(<[CardRecord]>::to_vec), settled);
    }
}
