//! YML feed generation.
//!
//! # Pipeline
//!
//! 1. [`FilterSelection::from_query`] turns the request parameters into a selection
//! 2. [`render`] reads shop, categories, and products from the catalog
//! 3. Each product passing the selection becomes an [`Offer`]
//! 4. The whole document is written into memory; callers send it only on success
//!
//! # Document Shape
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <!DOCTYPE yml_catalog SYSTEM "shops.dtd">
//! <yml_catalog date="2026-10-18 14:05">
//!   <shop>
//!     <name/> <company/> <url/>
//!     <currencies><currency id="RUB" rate="1"/></currencies>
//!     <categories><category id="5">Boots</category>...</categories>
//!     <offers><offer id="7" available="true">...</offer>...</offers>
//!   </shop>
//! </yml_catalog>
//! ```

mod document;
pub mod filter;
pub mod offer;

pub use document::{DATE_FORMAT, render};
pub use filter::{FeedQuery, FilterSelection};
pub use offer::Offer;

use thiserror::Error;

use crate::catalog::CatalogError;

/// Errors that abort feed generation.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Error getting site info: {0}")]
    ShopInfo(#[source] CatalogError),

    #[error("Error getting categories: {0}")]
    Categories(#[source] CatalogError),

    #[error("Error getting products: {0}")]
    Products(#[source] CatalogError),

    #[error("Error resolving category slug '{slug}': {source}")]
    SlugLookup {
        slug: String,
        #[source]
        source: CatalogError,
    },

    #[error("XML write error: {0}")]
    Write(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_error_display() {
        let err = FeedError::Categories(CatalogError::Api {
            status: 500,
            message: "db down".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Error getting categories: API error: 500 - db down"
        );

        let err = FeedError::SlugLookup {
            slug: "shoes".to_string(),
            source: CatalogError::RateLimited(5),
        };
        assert_eq!(
            err.to_string(),
            "Error resolving category slug 'shoes': Rate limited, retry after 5 seconds"
        );
    }
}
