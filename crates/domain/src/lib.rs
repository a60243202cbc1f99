//! Domain layer for Expo Manager backend.
//!
//! This crate contains:
//! - Access-code construction
//! - Branding-asset role definitions
//! - Request/response models for the HTTP layer

pub mod models;
