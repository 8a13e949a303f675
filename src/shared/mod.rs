//! Shared Module
//!
//! This module contains types and data structures that are shared between
//! the server and the client. These types travel over the JSON service
//! endpoints and the card change stream.
//!
//! # Overview
//!
//! The shared module provides platform-agnostic types that can be used
//! in both server and client code. All types are designed for serialization
//! and transmission over HTTP.

/// Card record, profile document and eligibility rules
pub mod card;

/// Like notifications
pub mod notification;

/// Card change events
pub mod event;

/// Request and response envelopes for the service endpoints
pub mod api;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use card::{CardRecord, HandleEntry, Profile};
pub use notification::LikeNotification;
pub use event::{CardChange, DeletedCard};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
