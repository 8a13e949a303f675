//! Service Envelopes
//!
//! Request and response types for the card and notification services.
//! Successful responses wrap their payload in `{ "data": ... }`; failures
//! are rendered by the backend as `{ "error": "...", "status": n }`.

use serde::{Deserialize, Serialize};

use crate::shared::error::SharedError;
use crate::shared::notification::LikeNotification;

/// Default page size for list endpoints
pub const DEFAULT_LIMIT: usize = 20;

/// Largest page size a caller may request
pub const MAX_LIMIT: usize = 100;

/// Clamp an optional caller-supplied limit into `1..=MAX_LIMIT`
pub fn clamp_limit(limit: Option<i64>) -> usize {
    match limit {
        None => DEFAULT_LIMIT,
        Some(n) if n < 1 => 1,
        Some(n) => (n as u64).min(MAX_LIMIT as u64) as usize,
    }
}

/// Successful response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataResponse<T> {
    pub data: T,
}

impl<T> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default)]
    pub status: Option<u16>,
}

/// Which set of cards to list
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    /// The caller's own cards (requires a bearer credential)
    User,
    /// Public cards from everyone
    Community,
}

impl FeedType {
    pub fn parse(raw: Option<&str>) -> Result<Self, SharedError> {
        match raw.map(str::trim) {
            Some("user") => Ok(Self::User),
            Some("community") => Ok(Self::Community),
            Some(other) => Err(SharedError::validation(
                "type",
                format!("Invalid type '{}'. Must be 'user' or 'community'", other),
            )),
            None => Err(SharedError::validation(
                "type",
                "Missing type. Must be 'user' or 'community'",
            )),
        }
    }
}

/// Body of a card listing request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FetchCardsRequest {
    #[serde(rename = "type", default)]
    pub feed_type: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Body of a delete request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteCardRequest {
    #[serde(default)]
    pub id: Option<String>,
}

/// Result payload of a delete request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeleteCardResult {
    pub success: bool,
}

/// Body of a notifications request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsRequest {
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub mark_as_read: bool,
}

/// Notifications page plus the caller's total unread count
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsResponse {
    pub data: Vec<LikeNotification>,
    pub unread_count: u64,
}
