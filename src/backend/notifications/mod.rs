//! Like Notifications
//!
//! `POST /api/notifications` returns the caller's newest notifications and
//! can mark the returned unread ones as read.

pub mod handlers;

pub use handlers::list_notifications;
