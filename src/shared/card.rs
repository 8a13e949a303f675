//! Card Data Structure
//!
//! Represents one user's shareable dev card. The record itself is stored
//! with snake_case columns while the nested profile document keeps the
//! camelCase shape the card editor writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::error::SharedError;

/// Longest slug accepted at the service boundary
pub const MAX_SLUG_LEN: usize = 64;

/// A single social handle on a card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HandleEntry {
    /// Platform the handle belongs to (e.g. "x", "github")
    #[serde(default)]
    pub platform: Option<String>,
    /// The handle itself, without a leading '@'
    #[serde(default)]
    pub handle: String,
}

/// The profile document nested inside a card record
///
/// Every field defaults when absent so that older, loosely-shaped documents
/// still decode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub handles: Vec<HandleEntry>,
    #[serde(default)]
    pub primary_model: Option<String>,
    #[serde(default)]
    pub secondary_model: Option<String>,
    #[serde(default)]
    pub plan_tier: Option<String>,
    #[serde(default)]
    pub is_max_mode: bool,
    /// Free-text extras shown on the back of the card
    #[serde(default)]
    pub extras: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// A persisted dev card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardRecord {
    /// Unique card ID
    pub id: Uuid,
    /// Human-shareable slug, unique and immutable once assigned
    pub slug: String,
    /// Owning subject
    pub user_id: Uuid,
    /// Nested profile document
    #[serde(default)]
    pub profile: Profile,
    /// Reference to the rendered card image, if one has been exported
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CardRecord {
    /// Create a new card with no image
    pub fn new(slug: impl Into<String>, user_id: Uuid, profile: Profile) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            slug: slug.into(),
            user_id,
            profile,
            image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set the rendered image reference
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Handle from the first handle slot, if it is non-empty
    pub fn primary_handle(&self) -> Option<&str> {
        self.profile
            .handles
            .first()
            .map(|entry| entry.handle.trim())
            .filter(|handle| !handle.is_empty())
    }

    /// Whether the card may appear in the community feed
    ///
    /// A card is public when it has a rendered image and its first handle
    /// slot carries a non-empty handle.
    pub fn is_public(&self) -> bool {
        let has_image = self
            .image_url
            .as_deref()
            .map(|url| !url.trim().is_empty())
            .unwrap_or(false);
        has_image && self.primary_handle().is_some()
    }
}

/// Validate a slug received at a service boundary
///
/// Returns the trimmed slug on success.
pub fn validate_slug(raw: &str) -> Result<&str, SharedError> {
    let slug = raw.trim();
    if slug.is_empty() {
        return Err(SharedError::validation("slug", "Slug is required"));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(SharedError::validation(
            "slug",
            format!("Slug must be at most {} characters", MAX_SLUG_LEN),
        ));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(SharedError::validation(
            "slug",
            "Slug may only contain letters, digits, '-' and '_'",
        ));
    }
    Ok(slug)
}
