//! Core types for the YML feed.
//!
//! This module provides type-safe wrappers for common catalog concepts.

pub mod id;
pub mod price;
pub mod status;

pub use id::*;
pub use price::{Amount, CurrencyCode, PriceError};
pub use status::StockStatus;
