//! Common test utilities and helpers
//!
//! - In-memory application fixtures driven through the real router
//! - Token helpers
//! - Assertion macros and response body helpers

pub mod assertions;
pub mod auth_helpers;
pub mod cards;

pub use assertions::*;
pub use auth_helpers::*;
pub use cards::*;
#[cfg(feature = "ssr")]
pub use fixtures::*;
