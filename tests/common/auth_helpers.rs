//! Authentication test helpers

/// Secret every test app signs and verifies tokens with
pub const TEST_SECRET: &str = "devcard-test-secret";

/// Generate a bearer token for `user_id` signed with `TEST_SECRET`
#[cfg(feature = "ssr")]
pub fn generate_test_token(user_id: uuid::Uuid) -> String {
    devcard::backend::auth::create_token(TEST_SECRET, user_id, None)
        .expect("Failed to generate test token")
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
