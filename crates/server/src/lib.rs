//! WooCommerce to Yandex Market Language (YML) feed service.
//!
//! This crate provides the feed server as a library, allowing the CLI and
//! integration tests to reuse the catalog client and the feed renderer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod feed;
pub mod middleware;
pub mod routes;
pub mod state;
