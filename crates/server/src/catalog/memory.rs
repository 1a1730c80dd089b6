//! In-memory catalog for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use woo_yml_core::CategoryId;

use crate::catalog::{CatalogError, CatalogProvider, Category, Product, ShopInfo};

/// A fixed catalog that records the include hints it was asked for.
pub struct MemoryCatalog {
    pub shop: ShopInfo,
    pub categories: Vec<Category>,
    pub products: Vec<Product>,
    /// When set, `categories()` fails with this status.
    pub fail_categories: Option<u16>,
    /// When set, `check_platform()` fails with `CommerceMissing`.
    pub commerce_missing: bool,
    pub seen_hints: Mutex<Vec<Option<Vec<CategoryId>>>>,
}

impl MemoryCatalog {
    pub fn new(categories: Vec<Category>, products: Vec<Product>) -> Self {
        Self {
            shop: ShopInfo {
                name: "Test & Shop".to_string(),
                url: "https://shop.test".to_string(),
            },
            categories,
            products,
            fail_categories: None,
            commerce_missing: false,
            seen_hints: Mutex::new(Vec::new()),
        }
    }
}

pub fn category(id: i64, name: &str, slug: &str) -> Category {
    Category {
        id: CategoryId::new(id),
        name: name.to_string(),
        slug: slug.to_string(),
    }
}

#[async_trait]
impl CatalogProvider for MemoryCatalog {
    async fn shop_info(&self) -> Result<ShopInfo, CatalogError> {
        Ok(self.shop.clone())
    }

    async fn categories(&self) -> Result<Vec<Category>, CatalogError> {
        if let Some(status) = self.fail_categories {
            return Err(CatalogError::Api {
                status,
                message: "term query failed".to_string(),
            });
        }
        Ok(self.categories.clone())
    }

    async fn category_by_slug(&self, slug: &str) -> Result<Option<Category>, CatalogError> {
        Ok(self.categories.iter().find(|c| c.slug == slug).cloned())
    }

    async fn published_products(
        &self,
        include_hint: Option<&[CategoryId]>,
    ) -> Result<Vec<Product>, CatalogError> {
        self.seen_hints
            .lock()
            .map_err(|_| CatalogError::CommerceNotLoaded("poisoned".to_string()))?
            .push(include_hint.map(<[CategoryId]>::to_vec));
        Ok(self.products.clone())
    }

    async fn check_platform(&self) -> Result<(), CatalogError> {
        if self.commerce_missing {
            return Err(CatalogError::CommerceMissing);
        }
        Ok(())
    }
}
