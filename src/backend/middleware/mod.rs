//! Middleware Module
//!
//! Request processing that runs before handlers.
//!
//! - **`auth`** - `AuthUser` extractor backed by `AuthGate`
//! - **`cors`** - Cross-origin headers and preflight handling for `/api`
//!
//! The share-preview gate lives with the rest of the preview code in
//! `backend::preview`.

pub mod auth;
pub mod cors;

pub use auth::AuthUser;
pub use cors::cors_middleware;
