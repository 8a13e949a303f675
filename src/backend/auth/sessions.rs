/**
 * Bearer Token Claims
 *
 * The identity provider issues HS256-signed JWTs whose `sub` claim is the
 * stable user id. This module decodes and validates them; `create_token`
 * mints compatible tokens for local development and tests.
 */

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Lifetime of tokens minted by `create_token`
pub const TOKEN_TTL_SECS: i64 = 30 * 24 * 60 * 60;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User ID
    pub sub: String,
    /// Email, when the provider includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Audience, a string or a list of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<serde_json::Value>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at time (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: uuid::Uuid, email: Option<String>) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user_id.to_string(),
            email,
            aud: None,
            exp: now + TOKEN_TTL_SECS,
            iat: now,
        }
    }
}

/// Sign `claims` with `secret`
pub fn encode_claims(secret: &str, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
    let key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &key)
}

/// Create a JWT token for a user
///
/// # Returns
/// JWT token string valid for 30 days
pub fn create_token(
    secret: &str,
    user_id: uuid::Uuid,
    email: Option<String>,
) -> Result<String, jsonwebtoken::errors::Error> {
    encode_claims(secret, &Claims::new(user_id, email))
}

/// Verify and decode a JWT token
///
/// The audience is only checked when `audience` is given.
pub fn verify_token(
    secret: &str,
    audience: Option<&str>,
    token: &str,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    match audience {
        Some(aud) => validation.set_audience(&[aud]),
        None => validation.validate_aud = false,
    }

    let token_data = decode::<Claims>(token, &key, &validation)?;
    Ok(token_data.claims)
}
