//! Shared utilities and common types for Expo Manager backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Filename and identifier sanitization
//! - Date formatting for attendee-facing output

pub mod dates;
pub mod sanitize;
