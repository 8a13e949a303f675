//! Real-time change stream tests
