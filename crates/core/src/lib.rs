//! Cartwheel Core - Shared types library.
//!
//! This crate provides common types used across all Cartwheel components.
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no store clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe entity IDs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
