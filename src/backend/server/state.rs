/**
 * Application State Management
 *
 * This module defines the application state structure and implements
 * the necessary `FromRef` traits for Axum state extraction.
 *
 * # Architecture
 *
 * The `AppState` struct serves as the central state container for the
 * application, holding:
 * - The card store and blob store behind trait objects
 * - The authorization gate
 * - The card change broadcast channel
 * - Immutable settings for share previews and the app shell
 *
 * Nothing in here is mutated after startup; all mutable data lives behind
 * the store traits.
 */

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::auth::AuthGate;
use crate::backend::preview::PreviewSettings;
use crate::backend::realtime::CardChangeBroadcast;
use crate::backend::store::{BlobStore, CardStore};
use crate::backend::server::config::ServerConfig;

/// Where the interactive app shell is served from
#[derive(Debug, Clone, Default)]
pub struct ShellSettings {
    /// Directory containing `index.html`
    pub dir: Option<PathBuf>,
}

impl ShellSettings {
    pub fn index_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|dir| dir.join("index.html"))
    }
}

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<dyn CardStore>,
    pub blobs: Arc<dyn BlobStore>,
    /// Bucket name used to map image URLs to blob paths
    pub blob_bucket: Arc<str>,
    pub auth: AuthGate,
    pub card_changes: CardChangeBroadcast,
    pub preview: PreviewSettings,
    pub shell: ShellSettings,
}

impl AppState {
    /// Build state with default preview and shell settings
    pub fn new(
        cards: Arc<dyn CardStore>,
        blobs: Arc<dyn BlobStore>,
        auth: AuthGate,
        card_changes: CardChangeBroadcast,
    ) -> Self {
        Self {
            cards,
            blobs,
            blob_bucket: Arc::from("polaroids"),
            auth,
            card_changes,
            preview: PreviewSettings::default(),
            shell: ShellSettings::default(),
        }
    }

    /// Apply the settings read from `config`
    pub fn configured(mut self, config: &ServerConfig) -> Self {
        self.blob_bucket = Arc::from(config.blob_bucket.as_str());
        self.preview = PreviewSettings::from_config(config);
        self.shell = ShellSettings {
            dir: config.shell_dir.clone(),
        };
        self
    }

    pub fn with_preview(mut self, preview: PreviewSettings) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_shell(mut self, shell: ShellSettings) -> Self {
        self.shell = shell;
        self
    }
}

impl FromRef<AppState> for AuthGate {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl FromRef<AppState> for CardChangeBroadcast {
    fn from_ref(state: &AppState) -> Self {
        state.card_changes.clone()
    }
}

impl FromRef<AppState> for PreviewSettings {
    fn from_ref(state: &AppState) -> Self {
        state.preview.clone()
    }
}

impl FromRef<AppState> for ShellSettings {
    fn from_ref(state: &AppState) -> Self {
        state.shell.clone()
    }
}
