//! WooCommerce REST API client.
//!
//! Reads the WordPress REST index (`/wp-json`) for site identity and the
//! WooCommerce v3 namespace (`/wp-json/wc/v3`) for categories and products.
//! Listings are paginated by the platform; every page is fetched and
//! accumulated before returning.

mod wire;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;
use woo_yml_core::CategoryId;

use crate::catalog::{CatalogError, CatalogProvider, Category, Product, ShopInfo};
use crate::config::WooCommerceConfig;

use wire::{
    WireAttributeTaxonomy, WireCategory, WireProduct, WireSiteIndex, convert_category,
    convert_product, convert_shop_info,
};

/// REST namespace the client talks to.
pub const WC_NAMESPACE: &str = "wc/v3";

/// Response header carrying the page count of a listing.
const TOTAL_PAGES_HEADER: &str = "x-wp-totalpages";

/// Characters of an error body kept in logs and error messages.
const ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// WooCommerceClient
// =============================================================================

/// Client for the WooCommerce REST API.
///
/// Cheaply cloneable; clones share the underlying connection pool.
#[derive(Clone)]
pub struct WooCommerceClient {
    inner: Arc<WooCommerceClientInner>,
}

struct WooCommerceClientInner {
    client: reqwest::Client,
    base_url: Url,
    consumer_key: String,
    consumer_secret: SecretString,
    page_size: u32,
}

impl WooCommerceClient {
    /// Create a new WooCommerce REST API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &WooCommerceConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("woo-yml/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(WooCommerceClientInner {
                client,
                base_url: config.base_url.clone(),
                consumer_key: config.consumer_key.clone(),
                consumer_secret: config.consumer_secret.clone(),
                page_size: config.page_size,
            }),
        })
    }

    /// Resolve a REST route relative to the site's `wp-json` root.
    fn endpoint(&self, route: &str) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("wp-json/{route}"))?)
    }

    /// GET a route and decode its JSON body, returning the response headers too.
    async fn get_json<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
        authenticated: bool,
    ) -> Result<(T, HeaderMap), CatalogError> {
        let url = self.endpoint(route)?;

        let mut request = self.inner.client.get(url).query(query);
        // The WordPress index is public; only WooCommerce routes take consumer keys
        if authenticated {
            request = request.basic_auth(
                &self.inner.consumer_key,
                Some(self.inner.consumer_secret.expose_secret()),
            );
        }

        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CatalogError::RateLimited(retry_after));
        }

        let headers = response.headers().clone();
        let body = response.text().await?;

        if !status.is_success() {
            let preview = body.chars().take(ERROR_BODY_PREVIEW).collect::<String>();
            tracing::error!(
                status = %status,
                route,
                body = %preview,
                "WooCommerce API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: preview,
            });
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok((value, headers)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    route,
                    body = %body.chars().take(ERROR_BODY_PREVIEW).collect::<String>(),
                    "Failed to parse WooCommerce response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    /// Fetch every page of a paginated WooCommerce listing.
    async fn get_all_pages<T: DeserializeOwned>(
        &self,
        route: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, CatalogError> {
        let mut items = Vec::new();
        let mut page: u32 = 1;

        loop {
            let mut page_query = query.to_vec();
            page_query.push(("per_page", self.inner.page_size.to_string()));
            page_query.push(("page", page.to_string()));

            let (batch, headers): (Vec<T>, _) = self.get_json(route, &page_query, true).await?;
            let page_count = total_pages(&headers);
            let batch_len = batch.len();
            items.extend(batch);

            debug!(route, page, page_count, batch_len, "Fetched listing page");

            if page >= page_count || batch_len == 0 {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    async fn site_index(&self) -> Result<WireSiteIndex, CatalogError> {
        let (index, _) = self.get_json("", &[], false).await?;
        Ok(index)
    }

    /// Map global attribute ids to their `pa_*` taxonomy slugs.
    async fn attribute_taxonomies(&self) -> Result<HashMap<i64, String>, CatalogError> {
        let (taxonomies, _): (Vec<WireAttributeTaxonomy>, _) = self
            .get_json(&format!("{WC_NAMESPACE}/products/attributes"), &[], true)
            .await?;
        Ok(taxonomies.into_iter().map(|t| (t.id, t.slug)).collect())
    }
}

/// Read the page count header; missing or malformed means a single page.
fn total_pages(headers: &HeaderMap) -> u32 {
    headers
        .get(TOTAL_PAGES_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<u32>().ok())
        .unwrap_or(1)
}

#[async_trait]
impl CatalogProvider for WooCommerceClient {
    #[instrument(skip(self))]
    async fn shop_info(&self) -> Result<ShopInfo, CatalogError> {
        Ok(convert_shop_info(self.site_index().await?))
    }

    #[instrument(skip(self))]
    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        let categories: Vec<WireCategory> = self
            .get_all_pages(
                &format!("{WC_NAMESPACE}/products/categories"),
                &[("hide_empty", "true".to_string())],
            )
            .await?;
        Ok(categories.into_iter().map(convert_category).collect())
    }

    #[instrument(skip(self))]
    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
        let (categories, _): (Vec<WireCategory>, _) = self
            .get_json(
                &format!("{WC_NAMESPACE}/products/categories"),
                &[("slug", slug.to_string())],
                true,
            )
            .await?;
        // Exact match; some hosts strip unknown query filters and return every term
        Ok(categories
            .into_iter()
            .find(|c| c.slug == slug)
            .map(convert_category))
    }

    #[instrument(skip(self))]
    async fn published_products(
        &self,
        include_hint: Option<&[CategoryId]>,
    ) -> Result<Vec<Product>, CatalogError> {
        let taxonomies = self.attribute_taxonomies().await?;

        let mut query = vec![("status", "publish".to_string())];
        if let Some(ids) = include_hint
            && !ids.is_empty()
        {
            let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(",");
            query.push(("category", joined));
        }

        let products: Vec<WireProduct> = self
            .get_all_pages(&format!("{WC_NAMESPACE}/products"), &query)
            .await?;

        Ok(products
            .into_iter()
            .map(|wire| convert_product(wire, &taxonomies))
            .collect())
    }

    #[instrument(skip(self))]
    async fn check_platform(&self) -> Result<(), CatalogError> {
        let index = self
            .site_index()
            .await
            .map_err(|e| CatalogError::PlatformUnreachable(e.to_string()))?;

        if !index.namespaces.iter().any(|ns| ns == WC_NAMESPACE) {
            return Err(CatalogError::CommerceMissing);
        }

        // A one-item product listing proves the namespace answers and the keys work
        let probe = [("per_page", "1".to_string())];
        let _: (Vec<serde_json::Value>, _) = self
            .get_json(&format!("{WC_NAMESPACE}/products"), &probe, true)
            .await
            .map_err(|e| CatalogError::CommerceNotLoaded(e.to_string()))?;

        debug!(site = %index.name, "WooCommerce platform check passed");
        Ok(())
    }
}
