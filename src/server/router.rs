//! Router assembly for the storefront API

use axum::Router;
use axum::routing::{get, post, put};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{
    AppState, adjust_stock, create_category, create_order, create_product, delete_category,
    delete_product, get_analytics, get_category, get_customer, get_order, get_product, health,
    list_categories, list_customers, list_orders, list_products, recent_audit, register_customer,
    update_category, update_order_status, update_product,
};

/// Build the full route table:
///
/// - `GET /health`
/// - products and categories CRUD plus `POST /products/{id}/stock`
/// - `POST /orders`, `GET /orders`, `GET /orders/{id}`,
///   `PUT /orders/{id}/status`
/// - `GET /analytics/{period}`
/// - customers registration and lookup
/// - `GET /audit`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/products", get(list_products).post(create_product))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/stock", post(adjust_stock))
        .route("/categories", get(list_categories).post(create_category))
        .route(
            "/categories/{id}",
            get(get_category)
                .put(update_category)
                .delete(delete_category),
        )
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", put(update_order_status))
        .route("/analytics/{period}", get(get_analytics))
        .route("/customers", get(list_customers).post(register_customer))
        .route("/customers/{id}", get(get_customer))
        .route("/audit", get(recent_audit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
