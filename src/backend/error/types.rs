/**
 * Backend Error Types
 *
 * This module defines error types specific to the backend server.
 * These errors are used in HTTP handlers and can be converted to HTTP responses.
 *
 * # Error Types
 *
 * - `Unauthorized` - Missing or invalid bearer credential
 * - `Forbidden` - Authenticated, but not the owner of the resource
 * - `NotFound` - The slug or id has no record
 * - `InvalidInput` - A required field is missing or malformed
 * - `UpstreamFailure` - The card store or blob store call itself failed
 *
 * `UpstreamFailure` is the only kind that is ever logged and swallowed
 * (blob deletion during card deletion). Everything else propagates to the
 * caller with the matching status code.
 */

use thiserror::Error;
use axum::http::StatusCode;
use crate::shared::SharedError;
use crate::backend::store::StoreError;

/// Backend-specific error types
///
/// # Usage
///
/// ```rust
/// use devcard::backend::error::BackendError;
///
/// let err = BackendError::not_found("Card not found");
/// assert_eq!(err.status_code().as_u16(), 404);
/// ```
#[derive(Debug, Error)]
pub enum BackendError {
    /// Missing or invalid credential
    #[error("Unauthorized: {message}")]
    Unauthorized {
        message: String,
    },

    /// The caller is authenticated but does not own the resource
    #[error("Forbidden: {message}")]
    Forbidden {
        message: String,
    },

    /// No record for the given slug or id
    #[error("Not found: {message}")]
    NotFound {
        message: String,
    },

    /// Missing or malformed required field
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
    },

    /// The card store or blob store failed
    #[error("Upstream failure: {message}")]
    UpstreamFailure {
        message: String,
    },

    /// Shared error (from shared module)
    #[error(transparent)]
    SharedError(#[from] SharedError),
}

impl BackendError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::UpstreamFailure {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `Unauthorized` - 401
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - `InvalidInput` - 400
    /// - `UpstreamFailure` - 500
    /// - `SharedError` - 400 for validation, 500 for serialization
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::UpstreamFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::Serialization { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                SharedError::Validation { .. } => StatusCode::BAD_REQUEST,
            },
        }
    }

    /// Get the error message sent to the caller
    pub fn message(&self) -> String {
        match self {
            Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::InvalidInput { message }
            | Self::UpstreamFailure { message } => message.clone(),
            Self::SharedError(SharedError::Validation { message, .. }) => message.clone(),
            Self::SharedError(err) => err.to_string(),
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(err: StoreError) -> Self {
        tracing::error!("Store call failed: {:?}", err);
        Self::upstream(err.to_string())
    }
}
