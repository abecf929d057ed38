//! Shelfstat
//!
//! Product stock service for marketplace admin panels.
//!
//! ## Features
//! - Size-stock extraction from raw variation blobs
//! - Stock aggregation with flat-stock fallback
//! - Three-way status classification (active / low-stock / out-of-stock)
//! - Product catalog REST API with per-row stock computation
//! - Catalog change events over NATS

use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use thiserror::Error;

pub mod domain;

pub use domain::stock::{
    aggregate_stock, classify_stock, extract_size_stock, ProductDetail, StockReport, StockStatus,
    VariationDetails, LOW_STOCK_THRESHOLD,
};
pub use domain::value_objects::SizeStockMap;

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Product not found")]
    ProductNotFound,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
