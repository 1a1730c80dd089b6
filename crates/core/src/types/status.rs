//! Product stock status.

use serde::{Deserialize, Serialize};

/// Inventory status of a product.
///
/// Maps to WooCommerce's `stock_status` values. Unknown values reported by
/// extensions deserialize as [`StockStatus::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    OnBackorder,
    #[serde(other)]
    Other,
}

impl StockStatus {
    /// Whether the product can currently be ordered.
    #[must_use]
    pub const fn is_orderable(self) -> bool {
        matches!(self, Self::InStock | Self::OnBackorder)
    }
}
