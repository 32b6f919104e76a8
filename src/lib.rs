//! # Boutik
//!
//! An e-commerce storefront and back-office core for a retail shop:
//! catalog, order ledger, inventory and a reporting dashboard, exposed as
//! typed services over a pluggable, transactional storage backend plus a
//! thin axum REST surface.
//!
//! ## Architecture
//!
//! - [`catalog`]: Product / Category CRUD with storefront and admin
//!   projections
//! - [`orders`]: the order ledger — validated, all-or-nothing order
//!   creation (web checkout and in-store POS) and the status state machine
//! - [`inventory`]: fail-closed stock arithmetic applied inside the
//!   backend's atomic section
//! - [`analytics`]: read-only, deterministic period metrics with
//!   period-over-period trends
//! - [`customers`] and [`audit`]: account records and the append-only
//!   admin trail
//! - [`storage`]: the store traits and the in-memory reference backend
//! - [`server`]: axum handlers, router and the [`server::ServerBuilder`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use boutik::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     boutik::server::init_tracing();
//!
//!     let config = StoreConfig::default();
//!     let bind = config.server.bind.clone();
//!     let app = ServerBuilder::new()
//!         .with_config(config)
//!         .with_backend(InMemoryStore::new())
//!         .build()?;
//!
//!     let listener = tokio::net::TcpListener::bind(&bind).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Ledger invariants
//!
//! - `total == Σ(unit_price × quantity) + delivery_fee` for every
//!   persisted order, web or POS
//! - line items freeze price and product name at sale time; catalog edits
//!   never reprice history
//! - stock never goes below zero: an order short on any line is rejected
//!   in full, and resubmitting the same idempotency key never decrements
//!   twice

pub mod analytics;
pub mod audit;
pub mod catalog;
pub mod config;
pub mod core;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::analytics::{AnalyticsService, AnalyticsSnapshot, ReportingPeriod};
    pub use crate::audit::{AuditEntry, AuditTrail};
    pub use crate::catalog::{
        CatalogService, Category, CategoryDraft, Product, ProductDraft, ProductFilter, ProductSize,
    };
    pub use crate::config::StoreConfig;
    pub use crate::core::{Money, ShopError, ShopResult};
    pub use crate::customers::{Customer, CustomerDirectory, CustomerDraft};
    pub use crate::orders::{
        DeliveryType, Order, OrderChannel, OrderCustomer, OrderFilter, OrderItem,
        OrderItemRequest, OrderLedger, OrderRequest, OrderStatus, PaymentMethod,
    };
    pub use crate::server::{AppState, ServerBuilder};
    pub use crate::storage::{
        AuditStore, CatalogStore, CustomerStore, InMemoryStore, OrderStore,
    };

    // === External dependencies ===
    pub use chrono::{DateTime, Utc};
    pub use uuid::Uuid;
}
