//! Platform check command.
//!
//! ```bash
//! woo-yml check
//! ```
//!
//! Exits non-zero when the site is unreachable, the `wc/v3` namespace is
//! missing, or the products endpoint fails.

use woo_yml_server::catalog::CatalogProvider;

use super::{CommandError, client_from_env};

/// Run the platform check against the configured store.
///
/// # Errors
///
/// Returns `CommandError` if configuration is invalid or the check fails.
pub async fn run() -> Result<(), CommandError> {
    let client = client_from_env()?;

    client.check_platform().await?;
    let shop = client.shop_info().await?;

    tracing::info!(name = %shop.name, url = %shop.url, "WooCommerce is active");
    Ok(())
}
