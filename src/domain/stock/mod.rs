//! Stock computation pipeline
//!
//! Raw product payload → variation normalization → size-stock extraction →
//! aggregation → status classification. Pure and synchronous end to end;
//! malformed input degrades to empty/zero rather than erroring.

pub mod extractor;
pub mod status;
pub mod variation;

pub use extractor::{extract_size_stock, FALLBACK_SIZE_LABELS};
pub use status::{aggregate_stock, classify_stock, classify_total, StockStatus, LOW_STOCK_THRESHOLD};
pub use variation::{VariationDetails, VariationRecord};

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::SizeStockMap;

/// Product-detail payload as the backend delivers it. Only the stock-relevant
/// fields are modeled; everything else in the response is ignored.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ProductDetail {
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default, rename = "variationDetails", alias = "variation_details")]
    pub variation_details: Option<VariationDetails>,
}

/// Derived stock view of one product: the per-size breakdown, its aggregate
/// total, and the badge status. Recomputed on every read.
#[derive(Clone, Debug, Serialize)]
pub struct StockReport {
    pub size_stock: SizeStockMap,
    pub total_stock: u32,
    pub status: StockStatus,
}

impl StockReport {
    pub fn for_detail(detail: &ProductDetail) -> Self {
        Self::from_parts(detail.variation_details.as_ref(), detail.stock)
    }

    pub fn from_parts(details: Option<&VariationDetails>, base_stock: Option<i64>) -> Self {
        let size_stock = extract_size_stock(details);
        let total_stock = aggregate_stock(&size_stock, base_stock);
        let status = classify_stock(&size_stock, base_stock);
        Self { size_stock, total_stock, status }
    }
}
