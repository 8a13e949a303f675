//! Shared Error Types
//!
//! Failures that both the server and the client can hit while handling
//! card payloads: a payload that does not decode, or a field that fails a
//! boundary check such as slug validation.
//!
//! ```rust
//! use devcard::shared::error::SharedError;
//!
//! let error = SharedError::validation("slug", "Slug is required");
//! assert_eq!(error.field(), Some("slug"));
//! ```
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Payload could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// A field failed a boundary check
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl SharedError {
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Offending field, for validation failures
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => Some(field),
            Self::Serialization { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}
