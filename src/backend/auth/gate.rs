/**
 * Authorization Gate
 *
 * Turns the `Authorization: Bearer <token>` header into an authenticated
 * subject. Every failure mode maps to `401 Unauthorized` so callers learn
 * nothing about why a credential was refused.
 */

use std::sync::Arc;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use uuid::Uuid;

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;

/// Authenticated user data extracted from the bearer token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Verifies bearer credentials against the provider's signing secret
#[derive(Clone)]
pub struct AuthGate {
    secret: Arc<str>,
    audience: Option<Arc<str>>,
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    pub fn new(secret: impl Into<String>, audience: Option<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
            audience: audience.map(Arc::from),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Resolve the caller from request headers
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthenticatedUser, BackendError> {
        let auth_header = headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                tracing::warn!("Missing Authorization header");
                BackendError::unauthorized("Missing authorization header")
            })?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                tracing::warn!("Invalid Authorization header format");
                BackendError::unauthorized("Invalid authorization header")
            })?;

        let claims = verify_token(&self.secret, self.audience.as_deref(), token).map_err(|e| {
            tracing::warn!("Invalid token: {:?}", e);
            BackendError::unauthorized("Invalid or expired token")
        })?;

        let user_id = Uuid::parse_str(&claims.sub).map_err(|e| {
            tracing::warn!("Invalid user ID in token: {:?}", e);
            BackendError::unauthorized("Invalid or expired token")
        })?;

        Ok(AuthenticatedUser {
            user_id,
            email: claims.email,
        })
    }
}
