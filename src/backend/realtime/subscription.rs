/**
 * Card Change Subscription Handler
 *
 * Serves `GET /realtime/cards` as a Server-Sent Events stream. Each card
 * change is sent as:
 *
 * ```text
 * event: card_change
 * data: {"type":"INSERT","record":{...}}
 * ```
 *
 * # Connection Management
 *
 * - Connections are kept alive using the SSE keep-alive comment lines
 * - Lagged receivers log how many events they missed and keep streaming;
 *   clients absorb gaps by refetching or by the idempotent merge
 * - The stream ends when the broadcast channel closes
 */

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
};
use futures_util::stream::{self, Stream};
use tokio::sync::broadcast::error::RecvError;

use crate::backend::realtime::broadcast::CardChangeBroadcast;

/// SSE event name for card changes
pub const CARD_CHANGE_EVENT: &str = "card_change";

/// Handle card change subscription (GET /realtime/cards)
pub async fn handle_card_subscription(
    State(broadcast_tx): State<CardChangeBroadcast>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    tracing::info!("[Realtime] Card change subscription opened");
    let broadcast_rx = broadcast_tx.subscribe();

    let stream = stream::unfold(broadcast_rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(change) => {
                    let data = match serde_json::to_string(&change) {
                        Ok(data) => data,
                        Err(e) => {
                            tracing::error!("[Realtime] Failed to serialize change: {:?}", e);
                            continue;
                        }
                    };
                    tracing::debug!("[Realtime] Sending {} for {}", change.kind(), change.card_id());
                    let event = Event::default().event(CARD_CHANGE_EVENT).data(data);
                    return Some((Ok(event), rx));
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("[Realtime] Receiver lagged, skipped {} events", skipped);
                    continue;
                }
                Err(RecvError::Closed) => {
                    tracing::info!("[Realtime] Broadcast channel closed, ending stream");
                    return None;
                }
            }
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}
