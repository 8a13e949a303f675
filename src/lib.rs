// Increase recursion limit for complex async operations
#![recursion_limit = "256"]

//! Devcard - Main Library
//!
//! Devcard distributes shareable developer cards: link-preview crawlers get
//! a server-rendered Open Graph document for `/c/{slug}`, signed-in owners
//! manage their cards through a small JSON API, and clients keep their card
//! feeds current from a live change stream.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between server and client
//!   - Card records, like notifications, change events
//!   - Request and response envelopes
//!   - Error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server with the share preview gate
//!   - Card and notification services behind bearer auth
//!   - Postgres and in-memory card stores, blob stores
//!   - Card change fan-out over Server-Sent Events
//!
//! - **`client`** - Native client side
//!   - `ApiClient` for the JSON API and the change stream
//!   - Feed cache reconciler
//!   - Card session controller
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the `backend` module and the
//!   `devcard-server` binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use devcard::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(&config).await;
//! let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! - `shared::error::SharedError` for validation and serialization
//! - `backend::error::BackendError` renders `{"error", "status"}` responses
//! - `client::ClientError` for everything the API client can hit

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;

/// Native client: API access, feed reconciliation, card session
#[cfg(not(target_arch = "wasm32"))]
pub mod client;
