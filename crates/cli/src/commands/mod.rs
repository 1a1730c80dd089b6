//! CLI subcommands.

pub mod check;
pub mod render;

use thiserror::Error;
use woo_yml_server::catalog::{CatalogError, WooCommerceClient};
use woo_yml_server::config::{ConfigError, WooCommerceConfig};
use woo_yml_server::feed::FeedError;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Catalog(#[from] CatalogError),

    #[error("{0}")]
    Feed(#[from] FeedError),

    #[error("Failed to write feed: {0}")]
    Io(#[from] std::io::Error),
}

/// Build a WooCommerce client from the environment.
fn client_from_env() -> Result<WooCommerceClient, CommandError> {
    let config = WooCommerceConfig::from_env()?;
    tracing::info!(store = %config.base_url, "Using WooCommerce store");
    Ok(WooCommerceClient::new(&config)?)
}
