//! Real-time Card Change Module
//!
//! Fans card change events out to connected clients over Server-Sent Events.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── broadcast.rs    - Broadcast channel type and helpers
//! └── subscription.rs - SSE subscription handler
//! ```
//!
//! Clients consume the stream through `client::api::ApiClient::card_changes`
//! and merge events with `client::feed`.

/// Card change broadcasting
pub mod broadcast;

/// Server-Sent Events subscription handler
pub mod subscription;

pub use broadcast::{broadcast_change, card_change_channel, CardChangeBroadcast};
pub use subscription::{handle_card_subscription, CARD_CHANGE_EVENT};
