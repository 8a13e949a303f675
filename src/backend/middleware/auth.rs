/**
 * Authentication Extractor
 *
 * Handlers that need a caller take an `AuthUser` argument. Axum runs the
 * extractor before the body extractor, so a request without a valid
 * bearer credential is refused with 401 before its body is read.
 */

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;

use crate::backend::auth::{AuthGate, AuthenticatedUser};
use crate::backend::error::BackendError;

/// Axum extractor for the authenticated caller
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthenticatedUser>() {
            return Ok(AuthUser(user.clone()));
        }

        let gate = AuthGate::from_ref(state);
        let user = gate.authenticate(&parts.headers)?;
        parts.extensions.insert(user.clone());
        Ok(AuthUser(user))
    }
}
