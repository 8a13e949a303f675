//! Test suite for devcard
//!
//! This module organizes all tests

pub mod common;
