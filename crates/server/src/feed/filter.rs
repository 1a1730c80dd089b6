//! Category filter selection built from the feed request's query string.
//!
//! # Query Parameters
//!
//! - `all=1` - show every category and product (exclusions still apply to categories)
//! - `categories=5,shoes` - include only these category ids or slugs
//! - `exclude_categories=9` - exclude these category ids or slugs
//!
//! Numeric tokens are taken as ids directly. Other tokens are resolved by slug
//! through the catalog and silently dropped when no category matches.

use serde::Deserialize;
use tracing::debug;
use woo_yml_core::CategoryId;

use crate::catalog::CatalogProvider;
use crate::feed::FeedError;

/// Raw feed request parameters, deserialized once per request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeedQuery {
    pub all: Option<String>,
    pub categories: Option<String>,
    pub exclude_categories: Option<String>,
}

impl FeedQuery {
    /// Parse a raw query string.
    ///
    /// Unknown keys are ignored and a repeated key keeps its last value, so
    /// parsing never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let mut query = Self::default();
        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            let slot = match key.as_ref() {
                "all" => &mut query.all,
                "categories" => &mut query.categories,
                "exclude_categories" => &mut query.exclude_categories,
                _ => continue,
            };
            *slot = Some(value.into_owned());
        }
        query
    }
}

/// Which categories and products make it into the feed.
///
/// `include` and `exclude` keep duplicates and may overlap; exclusion wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    show_all: bool,
    include: Vec<CategoryId>,
    exclude: Vec<CategoryId>,
}

impl FilterSelection {
    /// Selection that bypasses `include` entirely.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            show_all: true,
            include: Vec::new(),
            exclude: Vec::new(),
        }
    }

    /// Selection from explicit include and exclude lists.
    #[must_use]
    pub const fn new(include: Vec<CategoryId>, exclude: Vec<CategoryId>) -> Self {
        Self {
            show_all: false,
            include,
            exclude,
        }
    }

    /// Build the selection for a request.
    ///
    /// With `all=1` nothing else is parsed. Otherwise each comma-separated
    /// token of `categories` and `exclude_categories` is resolved on its own.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError::SlugLookup`] if the catalog fails while resolving
    /// a slug. A slug with no matching category is not an error.
    pub async fn from_query(
        query: &FeedQuery,
        catalog: &dyn CatalogProvider,
    ) -> Result<Self, FeedError> {
        if query.all.as_deref().is_some_and(is_show_all) {
            return Ok(Self::all());
        }

        let include = resolve_tokens(query.categories.as_deref(), catalog).await?;
        let exclude = resolve_tokens(query.exclude_categories.as_deref(), catalog).await?;

        Ok(Self::new(include, exclude))
    }

    #[must_use]
    pub const fn is_show_all(&self) -> bool {
        self.show_all
    }

    #[must_use]
    pub fn include(&self) -> &[CategoryId] {
        &self.include
    }

    #[must_use]
    pub fn exclude(&self) -> &[CategoryId] {
        &self.exclude
    }

    /// Category ids to pass to the catalog as a listing hint, if any.
    #[must_use]
    pub fn include_hint(&self) -> Option<&[CategoryId]> {
        (!self.show_all && !self.include.is_empty()).then_some(self.include.as_slice())
    }

    /// Whether a `<category>` entry is emitted.
    #[must_use]
    pub fn should_include_category(&self, id: CategoryId) -> bool {
        if self.show_all || self.include.is_empty() {
            return !self.exclude.contains(&id);
        }
        self.include.contains(&id) && !self.exclude.contains(&id)
    }

    /// Whether a product with the given assigned categories gets an offer.
    ///
    /// Show-all admits every product, even ones in excluded categories.
    #[must_use]
    pub fn should_include_product(&self, product_categories: &[CategoryId]) -> bool {
        if self.show_all {
            return true;
        }

        let excluded = product_categories.iter().any(|id| self.exclude.contains(id));
        if self.include.is_empty() {
            return !excluded;
        }

        let included = product_categories.iter().any(|id| self.include.contains(id));
        included && !excluded
    }
}

/// Resolve a comma-separated token list into category ids.
async fn resolve_tokens(
    raw: Option<&str>,
    catalog: &dyn CatalogProvider,
) -> Result<Vec<CategoryId>, FeedError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut ids = Vec::new();
    for token in raw.split(',') {
        if let Some(id) = parse_numeric_id(token) {
            ids.push(id);
            continue;
        }

        let slug = token.trim();
        if slug.is_empty() {
            continue;
        }

        match catalog
            .category_by_slug(slug)
            .await
            .map_err(|source| FeedError::SlugLookup {
                slug: slug.to_string(),
                source,
            })? {
            Some(category) => ids.push(category.id),
            None => debug!(slug, "Dropping unknown category slug"),
        }
    }

    Ok(ids)
}

/// Parse a loose numeric string: optional sign, digits, decimal point, exponent.
fn parse_number(token: &str) -> Option<f64> {
    let trimmed = token.trim();
    if trimmed.is_empty()
        || !trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Numeric token to category id; fractional values truncate toward zero.
fn parse_numeric_id(token: &str) -> Option<CategoryId> {
    if let Ok(id) = token.trim().parse::<i64>() {
        return Some(CategoryId::new(id));
    }
    let value = parse_number(token)?;
    #[allow(clippy::cast_possible_truncation)] // Saturating cast; ids never approach i64 bounds
    Some(CategoryId::new(value.trunc() as i64))
}

/// `all` turns on only when it equals the number 1.
fn is_show_all(raw: &str) -> bool {
    parse_number(raw).is_some_and(|v| (v - 1.0).abs() < f64::EPSILON)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::catalog::memory::{MemoryCatalog, category};

    fn ids(raw: &[i64]) -> Vec<CategoryId> {
        raw.iter().copied().map(CategoryId::new).collect()
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new(
            vec![category(5, "Boots", "boots"), category(12, "Shoes", "shoe-slug")],
            Vec::new(),
        )
    }

    fn query(all: Option<&str>, categories: Option<&str>, exclude: Option<&str>) -> FeedQuery {
        FeedQuery {
            all: all.map(String::from),
            categories: categories.map(String::from),
            exclude_categories: exclude.map(String::from),
        }
    }

    #[test]
    fn test_parse_raw_query() {
        let parsed = FeedQuery::parse("categories=5%2Cshoe-slug&exclude_categories=9&utm=x");
        assert_eq!(parsed.all, None);
        assert_eq!(parsed.categories.as_deref(), Some("5,shoe-slug"));
        assert_eq!(parsed.exclude_categories.as_deref(), Some("9"));

        let parsed = FeedQuery::parse("all=0&all=1");
        assert_eq!(parsed.all.as_deref(), Some("1"));

        let parsed = FeedQuery::parse("");
        assert_eq!(parsed.categories, None);
    }

    #[tokio::test]
    async fn test_ids_and_slugs_resolve() {
        let selection =
            FilterSelection::from_query(&query(None, Some("5,shoe-slug"), Some("9")), &catalog())
                .await
                .unwrap();

        assert!(!selection.is_show_all());
        assert_eq!(selection.include(), ids(&[5, 12]).as_slice());
        assert_eq!(selection.exclude(), ids(&[9]).as_slice());
    }

    #[tokio::test]
    async fn test_unknown_slug_is_dropped() {
        let selection =
            FilterSelection::from_query(&query(None, Some("nope,7,,"), None), &catalog())
                .await
                .unwrap();
        assert_eq!(selection.include(), ids(&[7]).as_slice());
        assert!(selection.exclude().is_empty());
    }

    #[tokio::test]
    async fn test_all_short_circuits_parsing() {
        let selection =
            FilterSelection::from_query(&query(Some("1"), Some("5"), Some("9")), &catalog())
                .await
                .unwrap();
        assert_eq!(selection, FilterSelection::all());
        assert!(selection.exclude().is_empty());
    }

    #[tokio::test]
    async fn test_all_other_values_do_not_show_all() {
        for raw in ["0", "yes", "", "2", "true"] {
            let selection = FilterSelection::from_query(&query(Some(raw), None, None), &catalog())
                .await
                .unwrap();
            assert!(!selection.is_show_all(), "all={raw:?} must not enable show-all");
        }
    }

    #[tokio::test]
    async fn test_duplicates_and_overlap_are_kept() {
        let selection =
            FilterSelection::from_query(&query(None, Some("5,5,boots"), Some("5")), &catalog())
                .await
                .unwrap();
        assert_eq!(selection.include(), ids(&[5, 5, 5]).as_slice());
        assert_eq!(selection.exclude(), ids(&[5]).as_slice());
        assert!(!selection.should_include_category(CategoryId::new(5)));
    }

    #[test]
    fn test_parse_numeric_id() {
        assert_eq!(parse_numeric_id("42"), Some(CategoryId::new(42)));
        assert_eq!(parse_numeric_id(" 42 "), Some(CategoryId::new(42)));
        assert_eq!(parse_numeric_id("+7"), Some(CategoryId::new(7)));
        assert_eq!(parse_numeric_id("3.9"), Some(CategoryId::new(3)));
        assert_eq!(parse_numeric_id("1e2"), Some(CategoryId::new(100)));
        assert_eq!(parse_numeric_id("shoes"), None);
        assert_eq!(parse_numeric_id("12abc"), None);
        assert_eq!(parse_numeric_id("inf"), None);
        assert_eq!(parse_numeric_id(""), None);
    }

    #[test]
    fn test_is_show_all() {
        assert!(is_show_all("1"));
        assert!(is_show_all("01"));
        assert!(is_show_all("1.0"));
        assert!(!is_show_all("1a"));
        assert!(!is_show_all("0"));
    }

    #[test]
    fn test_category_predicate_show_all_honors_exclude() {
        let mut selection = FilterSelection::all();
        selection.exclude = ids(&[9]);
        for id in [1, 5, 12, 100] {
            assert!(selection.should_include_category(CategoryId::new(id)));
        }
        assert!(!selection.should_include_category(CategoryId::new(9)));
    }

    #[test]
    fn test_empty_selection_admits_everything() {
        let selection = FilterSelection::default();
        for id in [1, 5, 9, 12] {
            assert!(selection.should_include_category(CategoryId::new(id)));
        }
        assert!(selection.should_include_product(&ids(&[1, 2, 3])));
        assert!(selection.should_include_product(&[]));
    }

    #[test]
    fn test_category_predicate_with_include() {
        let selection = FilterSelection::new(ids(&[5, 12]), ids(&[12]));
        assert!(selection.should_include_category(CategoryId::new(5)));
        assert!(!selection.should_include_category(CategoryId::new(12)));
        assert!(!selection.should_include_category(CategoryId::new(7)));
    }

    #[test]
    fn test_category_predicate_exclude_only() {
        let selection = FilterSelection::new(Vec::new(), ids(&[9]));
        assert!(selection.should_include_category(CategoryId::new(5)));
        assert!(!selection.should_include_category(CategoryId::new(9)));
    }

    #[test]
    fn test_product_predicate() {
        let selection = FilterSelection::new(ids(&[5, 12]), ids(&[9]));
        assert!(selection.should_include_product(&ids(&[5])));
        assert!(!selection.should_include_product(&ids(&[12, 9])));
        assert!(!selection.should_include_product(&ids(&[7])));
        assert!(!selection.should_include_product(&[]));
    }

    #[test]
    fn test_product_predicate_exclude_only() {
        let selection = FilterSelection::new(Vec::new(), ids(&[9]));
        assert!(selection.should_include_product(&ids(&[1, 2])));
        assert!(!selection.should_include_product(&ids(&[2, 9])));
        assert!(selection.should_include_product(&[]));
    }

    #[test]
    fn test_product_predicate_show_all_ignores_exclude() {
        let mut selection = FilterSelection::all();
        selection.exclude = ids(&[9]);
        assert!(selection.should_include_product(&ids(&[9])));
    }

    #[test]
    fn test_include_hint() {
        assert_eq!(FilterSelection::all().include_hint(), None);
        assert_eq!(FilterSelection::default().include_hint(), None);
        let selection = FilterSelection::new(ids(&[5]), Vec::new());
        assert_eq!(selection.include_hint(), Some(ids(&[5]).as_slice()));
    }
}
