//! Shelfstat - Product Stock Status Service

use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgPoolOptions;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;
use validator::Validate;

use shelfstat::domain::events::ProductEvent;
use shelfstat::domain::value_objects::Sku;
use shelfstat::{ServiceError, StockReport, StockStatus, VariationDetails};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid, pub sku: String, pub name: String, pub category: Option<String>, pub brand: Option<String>,
    pub price: i64, pub vat_rate: i32, pub image_url: Option<String>, pub images: Vec<String>,
    pub stock: Option<i64>, pub variation_details: Option<serde_json::Value>, pub is_active: bool,
    pub created_at: DateTime<Utc>, pub updated_at: DateTime<Utc>,
}

impl Product {
    fn stock_report(&self) -> StockReport {
        let details = VariationDetails::from_stored(self.variation_details.clone());
        StockReport::from_parts(details.as_ref(), self.stock)
    }
}

/// Product row plus the stock view derived from it on read.
#[derive(Debug, Serialize)]
pub struct ProductView {
    #[serde(flatten)] pub product: Product,
    #[serde(flatten)] pub stock_report: StockReport,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let stock_report = product.stock_report();
        Self { product, stock_report }
    }
}

#[derive(Clone)] pub struct AppState { pub db: sqlx::PgPool, pub nats: Option<async_nats::Client> }

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();
    let db = PgPoolOptions::new().max_connections(10).connect(&std::env::var("DATABASE_URL")?).await?;
    sqlx::migrate!("./migrations").run(&db).await?;
    let nats = match std::env::var("NATS_URL") {
        Ok(url) => async_nats::connect(&url).await.map_err(|e| tracing::warn!(error = %e, "NATS unavailable, events disabled")).ok(),
        Err(_) => None,
    };
    let state = AppState { db, nats };

    let app = Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "shelfstat"})) }))
        .route("/api/v1/products", get(list_products).post(create_product))
        .route("/api/v1/products/:id", get(get_product).put(update_product).delete(delete_product))
        .route("/api/v1/products/:id/stock", get(get_product_stock))
        .route("/api/v1/stock/summary", get(stock_summary))
        .layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive()).with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "8086".to_string());
    tracing::info!("shelfstat listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}

async fn publish_event(state: &AppState, event: ProductEvent) {
    let Some(nats) = &state.nats else { return };
    match serde_json::to_vec(&event) {
        Ok(payload) => {
            if let Err(e) = nats.publish(event.subject(), payload.into()).await {
                tracing::warn!(error = %e, subject = event.subject(), "event publish failed");
            }
        }
        Err(e) => tracing::warn!(error = %e, "event serialization failed"),
    }
}

#[derive(Debug, Deserialize)] pub struct ListParams { pub page: Option<u32>, pub per_page: Option<u32>, pub category: Option<String>, pub search: Option<String> }
#[derive(Debug, Serialize)] pub struct PaginatedResponse<T> { pub data: Vec<T>, pub total: i64, pub page: u32 }

async fn list_products(State(s): State<AppState>, Query(p): Query<ListParams>) -> shelfstat::Result<Json<PaginatedResponse<ProductView>>> {
    let page = p.page.unwrap_or(1).max(1); let per_page = p.per_page.unwrap_or(20).min(100);
    let products = sqlx::query_as::<_, Product>(
        "SELECT * FROM products WHERE is_active = TRUE \
         AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR sku ILIKE '%' || $1 || '%') \
         AND ($2::text IS NULL OR category = $2) \
         ORDER BY created_at DESC LIMIT $3 OFFSET $4")
        .bind(&p.search).bind(&p.category).bind(per_page as i64).bind(((page - 1) * per_page) as i64)
        .fetch_all(&s.db).await?;
    let total: (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM products WHERE is_active = TRUE \
         AND ($1::text IS NULL OR name ILIKE '%' || $1 || '%' OR sku ILIKE '%' || $1 || '%') \
         AND ($2::text IS NULL OR category = $2)")
        .bind(&p.search).bind(&p.category).fetch_one(&s.db).await?;
    Ok(Json(PaginatedResponse { data: products.into_iter().map(ProductView::from).collect(), total: total.0, page }))
}

async fn get_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> shelfstat::Result<Json<ProductView>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(&s.db).await?.ok_or(ServiceError::ProductNotFound)?;
    Ok(Json(product.into()))
}

async fn get_product_stock(State(s): State<AppState>, Path(id): Path<Uuid>) -> shelfstat::Result<Json<StockReport>> {
    let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1").bind(id).fetch_optional(&s.db).await?.ok_or(ServiceError::ProductNotFound)?;
    Ok(Json(product.stock_report()))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProductRequest {
    #[validate(length(min = 1, max = 200))] pub name: String,
    pub sku: Option<String>,
    #[validate(range(min = 0))] pub price: i64,
    pub category: Option<String>, pub brand: Option<String>,
    #[validate(range(min = 0, max = 100))] pub vat_rate: Option<i32>,
    pub image_url: Option<String>, pub images: Option<Vec<String>>,
    pub stock: Option<i64>, pub variation_details: Option<serde_json::Value>,
}

async fn create_product(State(s): State<AppState>, Json(r): Json<ProductRequest>) -> shelfstat::Result<(StatusCode, Json<ProductView>)> {
    r.validate()?;
    let sku = match &r.sku {
        Some(sku) => Sku::new(sku).map_err(|e| ServiceError::Validation(e.to_string()))?.to_string(),
        None => format!("SKU-{:08}", rand::random::<u32>()),
    };
    let product = sqlx::query_as::<_, Product>(
        "INSERT INTO products (id, sku, name, category, brand, price, vat_rate, image_url, images, stock, variation_details, is_active, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, TRUE, NOW(), NOW()) RETURNING *")
        .bind(Uuid::now_v7()).bind(&sku).bind(&r.name).bind(&r.category).bind(&r.brand).bind(r.price)
        .bind(r.vat_rate.unwrap_or(0)).bind(&r.image_url).bind(r.images.clone().unwrap_or_default())
        .bind(r.stock).bind(&r.variation_details)
        .fetch_one(&s.db).await?;
    let view = ProductView::from(product);
    publish_event(&s, ProductEvent::Created { product_id: view.product.id, sku, stock_status: view.stock_report.status }).await;
    Ok((StatusCode::CREATED, Json(view)))
}

async fn update_product(State(s): State<AppState>, Path(id): Path<Uuid>, Json(r): Json<ProductRequest>) -> shelfstat::Result<Json<ProductView>> {
    r.validate()?;
    let product = sqlx::query_as::<_, Product>(
        "UPDATE products SET name = $2, category = $3, brand = $4, price = $5, vat_rate = $6, image_url = $7, images = $8, stock = $9, variation_details = $10, updated_at = NOW() \
         WHERE id = $1 RETURNING *")
        .bind(id).bind(&r.name).bind(&r.category).bind(&r.brand).bind(r.price).bind(r.vat_rate.unwrap_or(0))
        .bind(&r.image_url).bind(r.images.clone().unwrap_or_default()).bind(r.stock).bind(&r.variation_details)
        .fetch_optional(&s.db).await?.ok_or(ServiceError::ProductNotFound)?;
    let view = ProductView::from(product);
    publish_event(&s, ProductEvent::Updated { product_id: view.product.id, stock_status: view.stock_report.status }).await;
    Ok(Json(view))
}

async fn delete_product(State(s): State<AppState>, Path(id): Path<Uuid>) -> shelfstat::Result<StatusCode> {
    let result = sqlx::query("UPDATE products SET is_active = FALSE, updated_at = NOW() WHERE id = $1").bind(id).execute(&s.db).await?;
    if result.rows_affected() == 0 { return Err(ServiceError::ProductNotFound); }
    publish_event(&s, ProductEvent::Deleted { product_id: id }).await;
    Ok(StatusCode::NO_CONTENT)
}

/// Per-status product counts for the dashboard badges. Status is derived in
/// process since it depends on the variation blob, not a stored column.
#[derive(Debug, Serialize)]
pub struct StockSummary { pub active: i64, pub low_stock: i64, pub out_of_stock: i64, pub total_products: i64 }

async fn stock_summary(State(s): State<AppState>) -> shelfstat::Result<Json<StockSummary>> {
    let rows: Vec<(Option<i64>, Option<serde_json::Value>)> =
        sqlx::query_as("SELECT stock, variation_details FROM products WHERE is_active = TRUE").fetch_all(&s.db).await?;
    let mut summary = StockSummary { active: 0, low_stock: 0, out_of_stock: 0, total_products: rows.len() as i64 };
    for (stock, blob) in rows {
        let details = VariationDetails::from_stored(blob);
        match StockReport::from_parts(details.as_ref(), stock).status {
            StockStatus::Active => summary.active += 1,
            StockStatus::LowStock => summary.low_stock += 1,
            StockStatus::OutOfStock => summary.out_of_stock += 1,
        }
    }
    Ok(Json(summary))
}
