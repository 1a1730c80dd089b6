//! Catalog Provider: shop, category, and product data for the feed.
//!
//! # Architecture
//!
//! - [`CatalogProvider`] is the seam between the feed and the e-commerce
//!   platform; handlers only see `Arc<dyn CatalogProvider>`
//! - [`WooCommerceClient`] implements it over the WordPress/WooCommerce REST API
//! - The platform is source of truth - NO local sync, NO caching; every feed
//!   request reads fresh data
//!
//! # Example
//!
//! ```rust,ignore
//! use woo_yml_server::catalog::{CatalogProvider, WooCommerceClient};
//!
//! let client = WooCommerceClient::new(&config.woocommerce)?;
//! client.check_platform().await?;
//!
//! let shop = client.shop_info().await?;
//! let products = client.published_products(None).await?;
//! ```

mod types;
pub mod woocommerce;

#[cfg(test)]
pub mod memory;

pub use types::*;
pub use woocommerce::WooCommerceClient;

use async_trait::async_trait;
use thiserror::Error;
use woo_yml_core::CategoryId;

/// Errors that can occur when reading from the catalog platform.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The platform answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Rate limited by the platform.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// Could not build a request URL.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The WordPress REST index could not be reached.
    #[error("WordPress REST API is not reachable: {0}")]
    PlatformUnreachable(String),

    /// The WooCommerce REST namespace is not registered.
    #[error("WooCommerce is not installed or not active")]
    CommerceMissing,

    /// WooCommerce is registered but its endpoints do not answer.
    #[error("WooCommerce is not properly loaded: {0}")]
    CommerceNotLoaded(String),
}

/// Read-only access to the e-commerce platform's catalog.
///
/// Implementations must not cache between calls; the feed expects fresh data
/// on every request.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Site display name and base URL.
    async fn shop_info(&self) -> Result<ShopInfo, CatalogError>;

    /// Product categories that contain at least one published product.
    async fn categories(&self) -> Result<Vec<Category>, CatalogError>;

    /// Look up a product category by slug.
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError>;

    /// All published products.
    ///
    /// `include_hint` narrows the listing to products in any of the given
    /// categories. It is an optimization only; callers re-filter the result.
    async fn published_products(
        &self,
        include_hint: Option<&[CategoryId]>,
    ) -> Result<Vec<Product>, CatalogError>;

    /// Confirm the commerce subsystem is installed, active, and answering.
    async fn check_platform(&self) -> Result<(), CatalogError>;
}
