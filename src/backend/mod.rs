//! Backend Module
//!
//! All server-side code: the Axum HTTP server that hands crawlers a share
//! preview, serves the card and notification endpoints, and streams card
//! changes to clients.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration, application state, initialization
//! - **`routes`** - Route configuration and router assembly
//! - **`preview`** - Share preview negotiation for `/c/{slug}`
//! - **`cards`** - Card lookup, listing and owner-only deletion
//! - **`notifications`** - Like notifications
//! - **`realtime`** - Card change broadcast and SSE stream
//! - **`store`** - Card store and blob store traits and adapters
//! - **`auth`** - Bearer token verification
//! - **`middleware`** - Auth extractors and CORS
//! - **`error`** - Backend-specific error types
//!
//! # State Management
//!
//! `AppState` holds the stores behind `Arc<dyn ...>`, the auth gate, the
//! card change broadcast sender and immutable settings. Handlers extract
//! it (or a `FromRef` slice of it) with `State`.
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; the error renders itself as
//! `{"error": "...", "status": n}` with the matching status code. The share
//! preview gate is the exception: it never fails a request.
//!
//! # Example
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

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Share preview negotiation
pub mod preview;

/// Card services
pub mod cards;

/// Like notifications
pub mod notifications;

/// Card change fan-out
pub mod realtime;

/// Card and blob storage
pub mod store;

/// Backend error types
pub mod error;

/// Bearer token verification
pub mod auth;

/// Middleware for request processing
pub mod middleware;

pub use error::BackendError;
pub use server::{create_app, AppState, ServerConfig};
