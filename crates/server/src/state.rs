//! Application state shared across handlers.

use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::catalog::{CatalogError, CatalogProvider};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    catalog: Arc<dyn CatalogProvider>,
    platform_ready: OnceCell<()>,
}

impl AppState {
    /// Create a new application state around a catalog provider.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                catalog,
                platform_ready: OnceCell::new(),
            }),
        }
    }

    /// Get a reference to the catalog provider.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.inner.catalog.as_ref()
    }

    /// Whether a platform check has already succeeded.
    #[must_use]
    pub fn is_platform_ready(&self) -> bool {
        self.inner.platform_ready.initialized()
    }

    /// Check the commerce platform once.
    ///
    /// Success is remembered for the life of the process. A failure is
    /// returned to the caller and the check runs again on the next call.
    ///
    /// # Errors
    ///
    /// Returns the [`CatalogError`] from [`CatalogProvider::check_platform`].
    pub async fn ensure_platform_ready(&self) -> Result<(), CatalogError> {
        self.inner
            .platform_ready
            .get_or_try_init(|| self.inner.catalog.check_platform())
            .await
            .map(|&()| ())
    }
}
