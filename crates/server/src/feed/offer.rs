//! Mapping of a catalog product onto a YML `<offer>`.

use woo_yml_core::{Amount, CategoryId, CurrencyCode, ProductId};

use crate::catalog::{Product, ShopInfo, attribute};

/// Sales notes used when the product has none.
pub const DEFAULT_SALES_NOTES: &str = "В наличии";

/// Fields of one `<offer>` element, fully resolved with fallbacks applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub id: ProductId,
    pub name: String,
    pub url: String,
    /// Pre-discount price, present only while on sale.
    pub old_price: Option<Amount>,
    pub price: Amount,
    pub currency: CurrencyCode,
    pub category_id: CategoryId,
    pub picture: Option<String>,
    pub description: String,
    pub sales_notes: String,
    pub vendor: Option<String>,
    pub vendor_code: Option<String>,
    pub delivery: bool,
    pub pickup: bool,
    pub store: bool,
    /// Weight as entered, in kilograms.
    pub weight: Option<String>,
}

impl Offer {
    /// Build the offer for a product that passed the category filter.
    ///
    /// Returns `None` when the product has no effective price; such products
    /// never appear in the feed.
    ///
    /// Text fields fall back or are omitted when blank, where blank means
    /// unset, `""` or `"0"`.
    #[must_use]
    pub fn from_product(product: &Product, shop: &ShopInfo) -> Option<Self> {
        let price = product.price.filter(|p| !p.is_blank())?;

        let name = present(&product.name).unwrap_or_else(|| format!("Товар #{}", product.id));
        let url = present(&product.permalink).unwrap_or_else(|| shop.url.clone());

        let old_price = match (product.sale_price, product.regular_price) {
            (Some(sale), Some(regular)) if !sale.is_blank() && sale < regular => Some(regular),
            _ => None,
        };

        let description = present(&product.description).unwrap_or_else(|| name.clone());
        let sales_notes = attribute_value(product, attribute::SALES_NOTES)
            .unwrap_or_else(|| DEFAULT_SALES_NOTES.to_string());

        Some(Self {
            id: product.id,
            url,
            old_price,
            price,
            currency: CurrencyCode::default(),
            category_id: product
                .category_ids
                .first()
                .copied()
                .unwrap_or(CategoryId::UNCATEGORIZED),
            picture: product.image_url.as_deref().and_then(present),
            description,
            sales_notes,
            vendor: attribute_value(product, attribute::BRAND),
            vendor_code: present(&product.sku),
            delivery: flag(product.attribute(attribute::DELIVERY)),
            pickup: flag(product.attribute(attribute::PICKUP)),
            store: flag(product.attribute(attribute::STORE)),
            weight: present(&product.weight),
            name,
        })
    }
}

/// `""` and `"0"` count as absent.
fn present(value: &str) -> Option<String> {
    (!value.is_empty() && value != "0").then(|| value.to_string())
}

fn attribute_value(product: &Product, name: &str) -> Option<String> {
    product.attribute(name).and_then(present)
}

/// Attribute flags are on only for the exact strings `"true"` and `"1"`.
fn flag(value: Option<&str>) -> bool {
    matches!(value, Some("true" | "1"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn shop() -> ShopInfo {
        ShopInfo {
            name: "Shop".to_string(),
            url: "https://shop.test".to_string(),
        }
    }

    fn amount(raw: &str) -> Option<Amount> {
        Amount::parse(raw).unwrap()
    }

    fn product() -> Product {
        Product {
            id: ProductId::new(7),
            name: "Boots".to_string(),
            permalink: "https://shop.test/boots".to_string(),
            regular_price: amount("100"),
            price: amount("100"),
            ..Product::default()
        }
    }

    fn with_attr(mut product: Product, key: &str, value: &str) -> Product {
        product.attributes.insert(key.to_string(), value.to_string());
        product
    }

    #[test]
    fn test_missing_price_skips_product() {
        let mut p = product();
        p.price = None;
        assert!(Offer::from_product(&p, &shop()).is_none());

        p.price = amount("0");
        assert!(Offer::from_product(&p, &shop()).is_none());
    }

    #[test]
    fn test_zero_with_decimals_is_a_price() {
        let mut p = product();
        p.regular_price = amount("0.00");
        p.price = amount("0.00");

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.price.to_string(), "0.00");
    }

    #[test]
    fn test_sale_price_emits_old_price() {
        let mut p = product();
        p.sale_price = amount("80");
        p.price = amount("80");

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.old_price, amount("100"));
        assert_eq!(offer.price, amount("80").unwrap());
    }

    #[test]
    fn test_no_sale_price_no_old_price() {
        let offer = Offer::from_product(&product(), &shop()).unwrap();
        assert_eq!(offer.old_price, None);
        assert_eq!(offer.price.to_string(), "100");
    }

    #[test]
    fn test_sale_not_below_regular_has_no_old_price() {
        let mut p = product();
        p.sale_price = amount("100");
        assert_eq!(Offer::from_product(&p, &shop()).unwrap().old_price, None);
    }

    #[test]
    fn test_defaults() {
        let mut p = product();
        p.name = String::new();
        p.permalink = String::new();

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.name, "Товар #7");
        assert_eq!(offer.url, "https://shop.test");
        assert_eq!(offer.description, "Товар #7");
        assert_eq!(offer.sales_notes, DEFAULT_SALES_NOTES);
        assert_eq!(offer.category_id, CategoryId::new(1));
        assert_eq!(offer.currency, CurrencyCode::RUB);
        assert_eq!(offer.picture, None);
        assert_eq!(offer.vendor, None);
        assert_eq!(offer.vendor_code, None);
        assert_eq!(offer.weight, None);
        assert!(!offer.delivery && !offer.pickup && !offer.store);
    }

    #[test]
    fn test_first_category_wins() {
        let mut p = product();
        p.category_ids = vec![CategoryId::new(12), CategoryId::new(5)];
        assert_eq!(
            Offer::from_product(&p, &shop()).unwrap().category_id,
            CategoryId::new(12)
        );
    }

    #[test]
    fn test_delivery_flags() {
        let p = with_attr(product(), attribute::DELIVERY, "1");
        let p = with_attr(p, attribute::PICKUP, "no");
        let p = with_attr(p, attribute::STORE, "true");

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert!(offer.delivery);
        assert!(!offer.pickup);
        assert!(offer.store);

        let p = with_attr(product(), attribute::DELIVERY, "TRUE");
        assert!(!Offer::from_product(&p, &shop()).unwrap().delivery);
    }

    #[test]
    fn test_optional_fields() {
        let mut p = with_attr(
            with_attr(product(), attribute::BRAND, "Acme"),
            attribute::SALES_NOTES,
            "Предоплата",
        );
        p.sku = "SKU-1".to_string();
        p.weight = "1.5".to_string();
        p.image_url = Some("https://shop.test/boots.jpg".to_string());
        p.description = "Warm".to_string();

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.vendor.as_deref(), Some("Acme"));
        assert_eq!(offer.sales_notes, "Предоплата");
        assert_eq!(offer.vendor_code.as_deref(), Some("SKU-1"));
        assert_eq!(offer.weight.as_deref(), Some("1.5"));
        assert_eq!(offer.picture.as_deref(), Some("https://shop.test/boots.jpg"));
        assert_eq!(offer.description, "Warm");
    }

    #[test]
    fn test_zero_strings_fall_back() {
        let mut p = with_attr(
            with_attr(product(), attribute::BRAND, "0"),
            attribute::SALES_NOTES,
            "0",
        );
        p.name = "0".to_string();
        p.description = "0".to_string();
        p.image_url = Some("0".to_string());

        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.name, "Товар #7");
        assert_eq!(offer.description, "Товар #7");
        assert_eq!(offer.vendor, None);
        assert_eq!(offer.sales_notes, DEFAULT_SALES_NOTES);
        assert_eq!(offer.picture, None);
    }

    #[test]
    fn test_zero_weight_and_sku_are_absent() {
        let mut p = product();
        p.weight = "0".to_string();
        p.sku = "0".to_string();
        let offer = Offer::from_product(&p, &shop()).unwrap();
        assert_eq!(offer.weight, None);
        assert_eq!(offer.vendor_code, None);
    }
}
