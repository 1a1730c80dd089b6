//! Domain views of catalog data.
//!
//! These are read-only snapshots fetched per request. Wire formats are
//! converted into these types by each provider.

use std::collections::BTreeMap;

use woo_yml_core::{Amount, CategoryId, ProductId, StockStatus};

/// Taxonomy slugs of the custom product attributes the feed reads.
pub mod attribute {
    /// Manufacturer / brand name.
    pub const BRAND: &str = "pa_brand";
    /// Free-form sales notes shown by the marketplace.
    pub const SALES_NOTES: &str = "pa_sales_notes";
    /// Courier delivery available (`"true"` / `"1"`).
    pub const DELIVERY: &str = "pa_delivery";
    /// Pickup point available (`"true"` / `"1"`).
    pub const PICKUP: &str = "pa_pickup";
    /// Purchasable in a physical store (`"true"` / `"1"`).
    pub const STORE: &str = "pa_store";
}

/// Shop identity, read once per request from site settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopInfo {
    /// Site display name (used for both shop name and company).
    pub name: String,
    /// Site base URL.
    pub url: String,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// A published product as seen by the feed.
#[derive(Debug, Clone, Default)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Public product page URL; may be empty.
    pub permalink: String,
    pub regular_price: Option<Amount>,
    pub sale_price: Option<Amount>,
    /// Effective price: sale price while on sale, else regular price.
    pub price: Option<Amount>,
    pub stock_status: StockStatus,
    pub stock_quantity: Option<i64>,
    pub sku: String,
    /// Weight in kilograms, as entered in the product editor.
    pub weight: String,
    pub description: String,
    /// Featured image URL.
    pub image_url: Option<String>,
    /// Assigned category ids, in the order the platform reports them.
    pub category_ids: Vec<CategoryId>,
    /// Attribute values keyed by sanitized name; global attributes carry a
    /// `pa_` prefix. Multiple options are joined with `", "`.
    pub attributes: BTreeMap<String, String>,
}

impl Product {
    /// Look up an attribute value.
    ///
    /// Matches the exact key first, then the global-taxonomy form with a
    /// `pa_` prefix, so `"brand"` also finds `"pa_brand"`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| self.attributes.get(&format!("pa_{name}")))
            .map(String::as_str)
    }
}

/// Reduce an attribute name to its taxonomy-key form.
///
/// Lowercases, turns whitespace into `-`, and drops punctuation other than
/// `-` and `_`.
#[must_use]
pub fn sanitize_key(name: &str) -> String {
    let mut key = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !key.ends_with('-') {
                key.push('-');
            }
        } else if c.is_alphanumeric() || c == '-' || c == '_' {
            key.extend(c.to_lowercase());
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_with(attributes: &[(&str, &str)]) -> Product {
        Product {
            attributes: attributes
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            ..Product::default()
        }
    }

    #[test]
    fn test_attribute_exact_match() {
        let product = product_with(&[("pa_brand", "Acme")]);
        assert_eq!(product.attribute(attribute::BRAND), Some("Acme"));
    }

    #[test]
    fn test_attribute_prefix_fallback() {
        let product = product_with(&[("pa_brand", "Acme")]);
        assert_eq!(product.attribute("brand"), Some("Acme"));
        assert_eq!(product.attribute(attribute::PICKUP), None);
    }

    #[test]
    fn test_sanitize_key() {
        assert_eq!(sanitize_key("Sales Notes"), "sales-notes");
        assert_eq!(sanitize_key("  Бренд  "), "бренд");
        assert_eq!(sanitize_key("pa_brand"), "pa_brand");
        assert_eq!(sanitize_key("Size (cm)"), "size-cm");
    }
}
