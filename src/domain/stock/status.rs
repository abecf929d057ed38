//! Stock aggregation and status classification

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Quantity, SizeStockMap};

/// Totals at or below this count (but above zero) classify as low stock.
/// Shared by the size-breakdown and flat-stock paths.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockStatus {
    Active,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::LowStock => "low-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }
}

impl std::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Total sellable quantity. A non-empty size breakdown wins outright and the
/// flat base stock is ignored; otherwise the clamped base stock is the total.
pub fn aggregate_stock(sizes: &SizeStockMap, base_stock: Option<i64>) -> u32 {
    if sizes.is_empty() {
        Quantity::from_base(base_stock).value()
    } else {
        sizes.total()
    }
}

/// Three-way classification over either stock source. Products with and
/// without size breakdowns get identical thresholds.
pub fn classify_stock(sizes: &SizeStockMap, base_stock: Option<i64>) -> StockStatus {
    if sizes.is_empty() {
        return classify_total(Quantity::from_base(base_stock).value());
    }
    if !sizes.any_positive() {
        return StockStatus::OutOfStock;
    }
    classify_total(sizes.total())
}

/// Threshold step shared by both paths.
pub fn classify_total(total: u32) -> StockStatus {
    if total == 0 {
        StockStatus::OutOfStock
    } else if total <= LOW_STOCK_THRESHOLD {
        StockStatus::LowStock
    } else {
        StockStatus::Active
    }
}
