/**
 * Card Change Events
 *
 * Row-level change events emitted by the card store for the card table.
 * This is also the SSE wire shape:
 *
 * ```json
 * {"type": "INSERT", "record": {...}}
 * {"type": "UPDATE", "record": {...}}
 * {"type": "DELETE", "old_record": {"id": "..."}}
 * ```
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::card::CardRecord;

/// Identity of a deleted card
///
/// Delete events only carry the primary key of the old row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeletedCard {
    pub id: Uuid,
}

/// A change to the card table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardChange {
    /// A card was created
    Insert { record: CardRecord },
    /// A card was modified
    Update { record: CardRecord },
    /// A card was removed
    Delete { old_record: DeletedCard },
}

impl CardChange {
    pub fn insert(record: CardRecord) -> Self {
        Self::Insert { record }
    }

    pub fn update(record: CardRecord) -> Self {
        Self::Update { record }
    }

    pub fn delete(id: Uuid) -> Self {
        Self::Delete {
            old_record: DeletedCard { id },
        }
    }

    /// ID of the card this event concerns
    pub fn card_id(&self) -> Uuid {
        match self {
            Self::Insert { record } | Self::Update { record } => record.id,
            Self::Delete { old_record } => old_record.id,
        }
    }

    /// Lowercase event name, used as the SSE event label
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Insert { .. } => "insert",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }
}
