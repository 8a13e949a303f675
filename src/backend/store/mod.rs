//! Card Store Module
//!
//! The relational store holding card records and like notifications, plus
//! the blob store holding rendered card images. Handlers only see the
//! [`CardStore`] and [`BlobStore`] traits; the concrete adapter is picked at
//! startup.
//!
//! # Module Structure
//!
//! ```text
//! store/
//! ├── mod.rs      - Store traits and errors
//! ├── postgres.rs - sqlx/PostgreSQL adapter and change listener
//! ├── memory.rs   - In-process adapter (no DATABASE_URL, tests)
//! └── blob.rs     - Blob store trait and adapters
//! ```
//!
//! # Change Events
//!
//! Every adapter reports insert/update/delete of card rows as
//! [`CardChange`](crate::shared::CardChange) events on the broadcast channel
//! it was constructed with. Postgres does this through a table trigger and
//! `LISTEN`: the trigger publishes the operation and id, and the listener
//! loads the row. The in-memory adapter emits directly.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::shared::{CardRecord, LikeNotification};

pub mod blob;
pub mod memory;
pub mod postgres;

pub use blob::{blob_path_from_url, BlobStore, LocalBlobStore, MemoryBlobStore};
pub use memory::MemoryCardStore;
pub use postgres::{
    resolve_notice, spawn_change_listener, ChangeNotice, ChangeOp, PgCardStore, CHANGE_CHANNEL,
};

/// Errors raised by store adapters
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("blob store error: {0}")]
    Blob(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn blob(message: impl Into<String>) -> Self {
        Self::Blob(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}

/// Read and delete access to card records and like notifications
///
/// Card creation and editing happen elsewhere; this trait only covers what
/// the share route and the mutation services need.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// Look up a card by its slug
    async fn card_by_slug(&self, slug: &str) -> Result<Option<CardRecord>, StoreError>;

    /// Look up a card by its id
    async fn card_by_id(&self, id: Uuid) -> Result<Option<CardRecord>, StoreError>;

    /// All cards owned by `owner`, most recent first
    async fn cards_by_owner(&self, owner: Uuid) -> Result<Vec<CardRecord>, StoreError>;

    /// The `limit` most recent cards that have an image
    async fn recent_image_cards(&self, limit: usize) -> Result<Vec<CardRecord>, StoreError>;

    /// Delete the card matching both `id` and `owner`
    ///
    /// Returns the number of rows removed.
    async fn delete_card(&self, id: Uuid, owner: Uuid) -> Result<u64, StoreError>;

    /// Notifications addressed to `recipient`, newest first
    async fn notifications_for(
        &self,
        recipient: Uuid,
        limit: usize,
    ) -> Result<Vec<LikeNotification>, StoreError>;

    /// Count of unread notifications addressed to `recipient`
    async fn unread_count(&self, recipient: Uuid) -> Result<u64, StoreError>;

    /// Set `read_at` on the given notifications that are still unread
    ///
    /// Rows that are already read or not addressed to `recipient` are left
    /// untouched. Returns the number of rows changed.
    async fn mark_read(
        &self,
        ids: &[Uuid],
        recipient: Uuid,
        at: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}
