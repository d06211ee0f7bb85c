//! # pa-core
//!
//! Core types, traits, and utilities for Page Attachments RS.
//!
//! This crate provides the foundational building blocks used across all other crates:
//! - Common error types
//! - Result type aliases
//! - Core traits (Entity, Identifiable, PageScoped)
//! - Configuration types (storage backend, thumbnail size variants)

pub mod error;
pub mod result;
pub mod traits;
pub mod config;

pub use error::*;
pub use result::*;
pub use traits::*;
