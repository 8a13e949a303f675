//! Share Preview Module
//!
//! Card links (`/c/{slug}`) unfurl in chat apps and social networks. Their
//! crawlers do not run the app shell, so the server answers them with a
//! pre-rendered page carrying Open Graph and Twitter Card metadata.
//! Humans get the app shell.
//!
//! # Module Structure
//!
//! ```text
//! preview/
//! ├── mod.rs        - PreviewSettings and exports
//! ├── agents.rs     - Crawler user-agent allow-list
//! ├── document.rs   - Preview fields and HTML rendering
//! └── negotiator.rs - Preview-or-pass-through decision and middleware
//! ```

use std::time::Duration;

use crate::backend::server::config::ServerConfig;

pub mod agents;
pub mod document;
pub mod negotiator;

pub use document::PreviewDocument;
pub use negotiator::{negotiate, share_preview_gate, Negotiation, RequestFacts};

/// Settings the negotiator needs to build absolute URLs and bound lookups
#[derive(Debug, Clone)]
pub struct PreviewSettings {
    /// Scheme used when `X-Forwarded-Proto` is absent
    pub public_scheme: String,
    /// Host used when the `Host` header is absent
    pub public_host: String,
    /// Path of the card image endpoint, the slug is appended
    pub og_image_path: String,
    /// Upper bound on the single store lookup
    pub fetch_timeout: Duration,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            public_scheme: "https".to_string(),
            public_host: "localhost:3000".to_string(),
            og_image_path: "/api/og".to_string(),
            fetch_timeout: Duration::from_millis(3000),
        }
    }
}

impl PreviewSettings {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self {
            public_scheme: config.public_scheme.clone(),
            public_host: config.public_host.clone(),
            og_image_path: config.og_image_path.clone(),
            fetch_timeout: config.preview_fetch_timeout,
        }
    }
}
