//! Community feed selection.
//!
//! The store returns the most recent cards that have an image; the feed
//! keeps the public ones, shuffles them and cuts to the requested size.
//! The candidate window is twice the limit, so the feed favors recent
//! cards over uniform sampling of the whole table.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::shared::CardRecord;

/// How many recent candidates to read for a feed of `limit` cards
pub fn candidate_window(limit: usize) -> usize {
    limit.saturating_mul(2)
}

/// Pick up to `limit` public cards from `candidates` in random order
pub fn select_community<R: Rng + ?Sized>(
    candidates: Vec<CardRecord>,
    limit: usize,
    rng: &mut R,
) -> Vec<CardRecord> {
    let mut eligible: Vec<CardRecord> = candidates.into_iter().filter(CardRecord::is_public).collect();
    eligible.shuffle(rng);
    eligible.truncate(limit);
    eligible
}
