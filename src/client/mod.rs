//! Client Module
//!
//! Native client side of the card service: configuration, the HTTP API
//! client and its change stream, the feed cache reconciler and the card
//! session controller.
//!
//! # Example
//!
//! ```rust,no_run
//! use devcard::client::{ApiClient, Config, FeedKey, FeedReconciler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ApiClient::new(Config::from_env()?);
//! let key = FeedKey::Community { limit: 20 };
//! let mut feed = FeedReconciler::new(key);
//! feed.seed(api.fetch_community(Some(20)).await?);
//! feed.activate(api.card_changes());
//! while let Some(change) = feed.next_change().await {
//!     println!("{} {}", change.kind(), change.card_id());
//! }
//! # Ok(())
//! # }
//! ```

/// HTTP client for the card and notification services
pub mod api;

/// Client configuration
pub mod config;

/// Server-Sent Events parsing
pub mod sse;

/// Feed cache reconciler
pub mod feed;

/// Active card session controller
pub mod session;

pub use api::{ApiClient, ClientError};
pub use config::Config;
pub use feed::{FeedCache, FeedKey, FeedReconciler};
pub use session::{CardSession, SessionPhase, SessionSignal, SessionSnapshot};
