//! WooCommerce YML Core - Shared catalog types.
//!
//! This crate provides common types used across the feed components:
//! - `server` - HTTP service that renders the YML feed
//! - `cli` - Command-line rendering and platform checks
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients. This keeps
//! it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and stock status

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
