//! WooCommerce REST API wire types and conversions to domain types.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use woo_yml_core::{Amount, CategoryId, ProductId, StockStatus};

use crate::catalog::types::{Category, Product, ShopInfo, sanitize_key};

/// `GET /wp-json` - the WordPress REST index.
#[derive(Debug, Deserialize)]
pub struct WireSiteIndex {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub home: String,
    #[serde(default)]
    pub namespaces: Vec<String>,
}

/// `GET /wc/v3/products/categories` item.
#[derive(Debug, Deserialize)]
pub struct WireCategory {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

/// `GET /wc/v3/products/attributes` item (global attribute taxonomies).
#[derive(Debug, Deserialize)]
pub struct WireAttributeTaxonomy {
    pub id: i64,
    pub slug: String,
}

/// `GET /wc/v3/products` item. Only the fields the feed reads.
#[derive(Debug, Deserialize)]
pub struct WireProduct {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub permalink: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub price: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub regular_price: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub sale_price: String,
    #[serde(default)]
    pub stock_status: StockStatus,
    #[serde(default)]
    pub stock_quantity: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub weight: String,
    #[serde(default)]
    pub categories: Vec<WireTermRef>,
    #[serde(default)]
    pub images: Vec<WireImage>,
    #[serde(default)]
    pub attributes: Vec<WireProductAttribute>,
}

#[derive(Debug, Deserialize)]
pub struct WireTermRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    #[serde(default)]
    pub src: String,
}

/// Attribute assigned to a product. `id` is 0 for product-local attributes.
#[derive(Debug, Deserialize)]
pub struct WireProductAttribute {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// WooCommerce sends `null` for some string fields on older installs.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn convert_shop_info(index: WireSiteIndex) -> ShopInfo {
    let url = if index.url.is_empty() {
        index.home
    } else {
        index.url
    };
    ShopInfo {
        name: index.name,
        url,
    }
}

pub fn convert_category(wire: WireCategory) -> Category {
    Category {
        id: CategoryId::new(wire.id),
        name: wire.name,
        slug: wire.slug,
    }
}

/// Convert a product. `taxonomies` maps global attribute ids to their `pa_*` slugs.
pub fn convert_product(wire: WireProduct, taxonomies: &HashMap<i64, String>) -> Product {
    let id = ProductId::new(wire.id);

    let attributes = wire
        .attributes
        .into_iter()
        .filter_map(|attr| {
            let key = attribute_key(&attr, taxonomies)?;
            Some((key, attr.options.join(", ")))
        })
        .collect();

    Product {
        id,
        regular_price: parse_price(id, "regular_price", &wire.regular_price),
        sale_price: parse_price(id, "sale_price", &wire.sale_price),
        price: parse_price(id, "price", &wire.price),
        name: wire.name,
        permalink: wire.permalink,
        stock_status: wire.stock_status,
        stock_quantity: wire.stock_quantity,
        sku: wire.sku,
        weight: wire.weight,
        description: wire.description,
        image_url: wire
            .images
            .into_iter()
            .next()
            .map(|image| image.src)
            .filter(|src| !src.is_empty()),
        category_ids: wire
            .categories
            .into_iter()
            .map(|term| CategoryId::new(term.id))
            .collect(),
        attributes,
    }
}

fn attribute_key(attr: &WireProductAttribute, taxonomies: &HashMap<i64, String>) -> Option<String> {
    if let Some(slug) = attr.slug.as_deref()
        && !slug.is_empty()
    {
        return Some(slug.to_string());
    }

    if attr.id != 0 {
        if let Some(slug) = taxonomies.get(&attr.id) {
            return Some(slug.clone());
        }
        let name = sanitize_key(&attr.name);
        return (!name.is_empty()).then(|| format!("pa_{name}"));
    }

    let name = sanitize_key(&attr.name);
    (!name.is_empty()).then_some(name)
}

/// Unparseable prices are logged and treated as unset.
fn parse_price(product: ProductId, field: &str, raw: &str) -> Option<Amount> {
    match Amount::parse(raw) {
        Ok(amount) => amount,
        Err(e) => {
            tracing::warn!(product_id = %product, field, error = %e, "Ignoring unparseable price");
            None
        }
    }
}
