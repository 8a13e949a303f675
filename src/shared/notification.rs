//! Like Notification Data Structure
//!
//! Created when someone likes a card; read by the card owner.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A "someone liked your card" notification
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, sqlx::FromRow)]
pub struct LikeNotification {
    /// Unique notification ID
    pub id: Uuid,
    /// The card that was liked
    pub polaroid_id: Uuid,
    /// Recipient (the card owner)
    pub user_id: Uuid,
    /// Display name of the person who liked the card
    pub liker_name: Option<String>,
    /// Avatar of the person who liked the card
    pub liker_avatar: Option<String>,
    pub created_at: DateTime<Utc>,
    /// When the recipient read it. Set once, never cleared.
    pub read_at: Option<DateTime<Utc>>,
}

impl LikeNotification {
    /// Create a new unread notification
    pub fn new(polaroid_id: Uuid, user_id: Uuid, liker_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            polaroid_id,
            user_id,
            liker_name: Some(liker_name.into()),
            liker_avatar: None,
            created_at: Utc::now(),
            read_at: None,
        }
    }

    pub fn is_unread(&self) -> bool {
        self.read_at.is_none()
    }

    /// Mark as read at `at` unless already read
    ///
    /// Returns true if the notification transitioned.
    pub fn mark_read(&mut self, at: DateTime<Utc>) -> bool {
        if self.read_at.is_some() {
            return false;
        }
        self.read_at = Some(at);
        true
    }
}
