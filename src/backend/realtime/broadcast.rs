/**
 * Card Change Broadcasting
 *
 * Card change events are fanned out with `tokio::sync::broadcast`, a
 * multi-producer, multi-consumer channel. Every open `/realtime/cards`
 * stream holds its own receiver.
 *
 * Producers are the card store adapters: the in-memory store sends
 * directly, the Postgres store relays its `LISTEN` notifications.
 */

use crate::shared::CardChange;
use tokio::sync::broadcast;

/// Channel capacity; slower receivers past this see `Lagged`
pub const CARD_CHANGE_CAPACITY: usize = 1000;

/// Card change event broadcast
pub type CardChangeBroadcast = broadcast::Sender<CardChange>;

/// Create the broadcast channel used by the card store and the SSE endpoint
pub fn card_change_channel() -> CardChangeBroadcast {
    let (tx, _) = broadcast::channel(CARD_CHANGE_CAPACITY);
    tx
}

/// Broadcast a card change to all subscribers
///
/// # Returns
///
/// Number of active subscribers that received the event (0 if no subscribers)
pub fn broadcast_change(broadcast_tx: &CardChangeBroadcast, change: CardChange) -> usize {
    let kind = change.kind();
    match broadcast_tx.send(change) {
        Ok(subscriber_count) => {
            tracing::debug!("[Realtime] {} broadcast to {} subscribers", kind, subscriber_count);
            subscriber_count
        }
        Err(_) => {
            tracing::debug!("[Realtime] No subscribers to receive {}", kind);
            0
        }
    }
}
