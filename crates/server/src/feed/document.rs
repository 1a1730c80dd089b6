//! YML document writer.

use std::io;

use chrono::NaiveDateTime;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use tracing::{debug, info};
use woo_yml_core::CurrencyCode;

use crate::catalog::CatalogProvider;
use crate::feed::{FeedError, FilterSelection, Offer};

/// Format of the `yml_catalog` `date` attribute (local time, minute precision).
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

const DOCTYPE: &str = r#"yml_catalog SYSTEM "shops.dtd""#;

/// Render the complete feed document into memory.
///
/// Nothing is streamed: the caller receives either the whole document or an
/// error, never a partial one.
///
/// # Errors
///
/// Returns [`FeedError`] if any catalog call fails or the XML writer fails.
pub async fn render(
    catalog: &dyn CatalogProvider,
    selection: &FilterSelection,
    generated_at: NaiveDateTime,
) -> Result<Vec<u8>, FeedError> {
    let shop = catalog.shop_info().await.map_err(FeedError::ShopInfo)?;
    let mut xml = YmlWriter::new();

    xml.prologue(&generated_at.format(DATE_FORMAT).to_string())?;
    xml.open("shop", &[])?;
    xml.element("name", &[], &shop.name)?;
    xml.element("company", &[], &shop.name)?;
    xml.element("url", &[], &shop.url)?;

    let currency = CurrencyCode::default();
    xml.open("currencies", &[])?;
    xml.empty("currency", &[("id", currency.code()), ("rate", currency.rate())])?;
    xml.close("currencies")?;

    let categories = catalog.categories().await.map_err(FeedError::Categories)?;
    let mut category_count = 0usize;
    xml.open("categories", &[])?;
    for category in categories
        .iter()
        .filter(|c| selection.should_include_category(c.id))
    {
        let id = category.id.to_string();
        xml.element("category", &[("id", id.as_str())], &category.name)?;
        category_count += 1;
    }
    xml.close("categories")?;
    debug!(total = categories.len(), emitted = category_count, "Categories written");

    let products = catalog
        .published_products(selection.include_hint())
        .await
        .map_err(FeedError::Products)?;

    let mut offer_count = 0usize;
    let mut unpriced = 0usize;
    xml.open("offers", &[])?;
    for product in products
        .iter()
        .filter(|p| selection.should_include_product(&p.category_ids))
    {
        let Some(offer) = Offer::from_product(product, &shop) else {
            unpriced += 1;
            continue;
        };
        if !product.stock_status.is_orderable() {
            debug!(
                product_id = %product.id,
                stock_status = ?product.stock_status,
                "Offer marked available despite stock status"
            );
        }
        xml.offer(&offer)?;
        offer_count += 1;
    }
    xml.close("offers")?;

    xml.close("shop")?;
    xml.close("yml_catalog")?;

    info!(
        shop = %shop.name,
        categories = category_count,
        products = products.len(),
        offers = offer_count,
        skipped_without_price = unpriced,
        "YML feed rendered"
    );

    Ok(xml.finish())
}

/// Thin element-level wrapper over the `quick-xml` writer.
///
/// Text and attribute values are escaped by `quick-xml`.
struct YmlWriter {
    inner: Writer<Vec<u8>>,
}

impl YmlWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn prologue(&mut self, date: &str) -> io::Result<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.inner
            .write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
        self.open("yml_catalog", &[("date", date)])
    }

    fn open(&mut self, name: &str, attributes: &[(&str, &str)]) -> io::Result<()> {
        let mut start = BytesStart::new(name);
        start.extend_attributes(attributes.iter().copied());
        self.inner.write_event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> io::Result<()> {
        self.inner.write_event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, name: &str, attributes: &[(&str, &str)]) -> io::Result<()> {
        let mut start = BytesStart::new(name);
        start.extend_attributes(attributes.iter().copied());
        self.inner.write_event(Event::Empty(start))
    }

    fn element(&mut self, name: &str, attributes: &[(&str, &str)], text: &str) -> io::Result<()> {
        self.open(name, attributes)?;
        self.inner.write_event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn offer(&mut self, offer: &Offer) -> io::Result<()> {
        let id = offer.id.to_string();
        self.open("offer", &[("id", id.as_str()), ("available", "true")])?;

        self.element("name", &[], &offer.name)?;
        self.element("url", &[], &offer.url)?;
        if let Some(old_price) = offer.old_price {
            self.element("oldprice", &[], &old_price.to_string())?;
        }
        self.element("price", &[], &offer.price.to_string())?;
        self.element("currencyId", &[], offer.currency.code())?;
        self.element("categoryId", &[], &offer.category_id.to_string())?;
        if let Some(picture) = &offer.picture {
            self.element("picture", &[], picture)?;
        }
        self.element("description", &[], &offer.description)?;
        self.element("sales_notes", &[], &offer.sales_notes)?;
        if let Some(vendor) = &offer.vendor {
            self.element("vendor", &[], vendor)?;
        }
        if let Some(vendor_code) = &offer.vendor_code {
            self.element("vendorCode", &[], vendor_code)?;
        }
        self.element("delivery", &[], bool_text(offer.delivery))?;
        self.element("pickup", &[], bool_text(offer.pickup))?;
        self.element("store", &[], bool_text(offer.store))?;
        if let Some(weight) = &offer.weight {
            self.element("param", &[("name", "Вес")], &format!("{weight} кг"))?;
        }
        if let Some(sku) = &offer.vendor_code {
            self.element("param", &[("name", "Артикул")], sku)?;
        }

        self.close("offer")
    }

    fn finish(self) -> Vec<u8> {
        self.inner.into_inner()
    }
}

const fn bool_text(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}
