//! Domain events
use serde::Serialize;
use uuid::Uuid;

use crate::domain::stock::StockStatus;

/// Events published to NATS when the product catalog changes. Consumers see
/// the recomputed stock status alongside the mutation, so badge caches can
/// be invalidated without a refetch.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProductEvent {
    Created { product_id: Uuid, sku: String, stock_status: StockStatus },
    Updated { product_id: Uuid, stock_status: StockStatus },
    Deleted { product_id: Uuid },
}

impl ProductEvent {
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Created { .. } => "shelfstat.products.created",
            Self::Updated { .. } => "shelfstat.products.updated",
            Self::Deleted { .. } => "shelfstat.products.deleted",
        }
    }
}
