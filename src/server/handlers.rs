//! HTTP handlers for the storefront and back-office API
//!
//! Handlers are thin: deserialize, call the service, serialize. Every
//! error renders as the taxonomy's JSON [`crate::core::ErrorResponse`].

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::analytics::{AnalyticsService, AnalyticsSnapshot, ReportingPeriod};
use crate::audit::{AuditEntry, AuditTrail};
use crate::catalog::{CatalogService, Category, CategoryDraft, Product, ProductDraft, ProductFilter};
use crate::config::StoreConfig;
use crate::core::ShopResult;
use crate::customers::{Customer, CustomerDirectory, CustomerDraft};
use crate::orders::{Order, OrderFilter, OrderLedger, OrderRequest, OrderStatus};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub ledger: OrderLedger,
    pub analytics: AnalyticsService,
    pub customers: CustomerDirectory,
    pub audit: AuditTrail,
    pub config: Arc<StoreConfig>,
}

// =============================================================================
// Health
// =============================================================================

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.config.store.name,
    }))
}

// =============================================================================
// Products
// =============================================================================

pub async fn list_products(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> ShopResult<Json<Vec<Product>>> {
    Ok(Json(state.catalog.list_products(&filter).await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(draft): Json<ProductDraft>,
) -> ShopResult<(StatusCode, Json<Product>)> {
    let product = state.catalog.create_product(draft).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<Json<Product>> {
    Ok(Json(state.catalog.get_product(id).await?))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<ProductDraft>,
) -> ShopResult<Json<Product>> {
    Ok(Json(state.catalog.update_product(id, draft).await?))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<StatusCode> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Request body for the admin stock override
#[derive(Debug, Deserialize)]
pub struct StockAdjustment {
    pub delta: i64,
    #[serde(default)]
    pub size: Option<String>,
}

pub async fn adjust_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StockAdjustment>,
) -> ShopResult<Json<Value>> {
    let stock = state
        .catalog
        .adjust_stock(id, body.size.as_deref(), body.delta)
        .await?;
    Ok(Json(json!({ "product_id": id, "stock": stock })))
}

// =============================================================================
// Categories
// =============================================================================

pub async fn list_categories(State(state): State<AppState>) -> ShopResult<Json<Vec<Category>>> {
    Ok(Json(state.catalog.list_categories().await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(draft): Json<CategoryDraft>,
) -> ShopResult<(StatusCode, Json<Category>)> {
    let category = state.catalog.create_category(draft).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<Json<Category>> {
    Ok(Json(state.catalog.get_category(id).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(draft): Json<CategoryDraft>,
) -> ShopResult<Json<Category>> {
    Ok(Json(state.catalog.update_category(id, draft).await?))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<StatusCode> {
    state.catalog.delete_category(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Orders
// =============================================================================

pub async fn create_order(
    State(state): State<AppState>,
    Json(request): Json<OrderRequest>,
) -> ShopResult<(StatusCode, Json<Order>)> {
    let order = state.ledger.create_order(request).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn list_orders(
    State(state): State<AppState>,
    Query(filter): Query<OrderFilter>,
) -> ShopResult<Json<Vec<Order>>> {
    Ok(Json(state.ledger.list_orders(&filter).await?))
}

pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<Json<Order>> {
    Ok(Json(state.ledger.get_order(id).await?))
}

/// Request body for a status transition
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

pub async fn update_order_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<StatusUpdate>,
) -> ShopResult<Json<Order>> {
    Ok(Json(state.ledger.update_status(id, body.status).await?))
}

// =============================================================================
// Analytics
// =============================================================================

pub async fn get_analytics(
    State(state): State<AppState>,
    Path(period): Path<String>,
) -> ShopResult<Json<AnalyticsSnapshot>> {
    let period: ReportingPeriod = period.parse()?;
    Ok(Json(state.analytics.snapshot(period).await?))
}

// =============================================================================
// Customers
// =============================================================================

pub async fn register_customer(
    State(state): State<AppState>,
    Json(draft): Json<CustomerDraft>,
) -> ShopResult<(StatusCode, Json<Customer>)> {
    let customer = state.customers.register(draft).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn list_customers(State(state): State<AppState>) -> ShopResult<Json<Vec<Customer>>> {
    Ok(Json(state.customers.list().await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ShopResult<Json<Customer>> {
    Ok(Json(state.customers.get(id).await?))
}

// =============================================================================
// Audit
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    #[serde(default)]
    pub limit: Option<usize>,
}

pub async fn recent_audit(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ShopResult<Json<Vec<AuditEntry>>> {
    let limit = query.limit.unwrap_or(50).min(500);
    Ok(Json(state.audit.recent(limit).await?))
}
