//! API integration tests
//!
//! Integration tests for all API endpoints

#[cfg(feature = "ssr")]
mod cards_test;
#[cfg(feature = "ssr")]
mod cors_test;
#[cfg(feature = "ssr")]
mod notifications_test;
