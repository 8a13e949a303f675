//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation, app shell handler
//! └── api_routes.rs   - `/api` endpoints
//! ```
//!
//! # Route Table
//!
//! | Route                            | Method     | Auth            |
//! |----------------------------------|------------|-----------------|
//! | `/c/{slug}`, `/c/`               | GET        | none            |
//! | `/api/get-polaroid-by-slug`      | GET        | none            |
//! | `/api/get-polaroids`             | POST, GET  | `type=user` only|
//! | `/api/delete-polaroid`           | POST       | bearer          |
//! | `/api/notifications`             | POST       | bearer          |
//! | `/api/*`                         | OPTIONS    | none            |
//! | `/realtime/cards`                | GET (SSE)  | none            |
//! | `/storage/*`                     | GET        | none            |

/// Main router creation
pub mod router;

/// API endpoint handlers
pub mod api_routes;

pub use router::create_router;
