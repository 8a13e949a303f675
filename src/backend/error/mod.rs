//! Backend Error Module
//!
//! `BackendError` is what every service handler returns on failure. It
//! maps onto the status codes the card and notification endpoints use and
//! renders itself as the `{"error", "status"}` envelope.
//!
//! Store failures convert into `UpstreamFailure` (500) and are logged at
//! the conversion point, so handlers can use `?` on store calls.

pub mod types;

mod conversion;

pub use types::BackendError;
