//! Authentication Module
//!
//! Bearer credentials are issued by an external identity provider; this
//! module only verifies them.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT claims, signing and verification
//! └── gate.rs         - AuthGate: Authorization header -> AuthenticatedUser
//! ```
//!
//! # Security
//!
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`
//! - The audience claim is checked only when `JWT_AUDIENCE` is set
//! - Every rejection is a 401 with no detail about the cause
//! - Authorization runs before any request body is read

/// JWT token generation and validation
pub mod sessions;

/// Authorization header verification
pub mod gate;

pub use gate::{AuthGate, AuthenticatedUser};
pub use sessions::{create_token, verify_token, Claims};
