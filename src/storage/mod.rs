//! Storage traits and backend implementations
//!
//! The services are agnostic to the backing store; they talk to these
//! traits. Every write that must be all-or-nothing (order commit with its
//! stock decrements, status transition with its restock) is a single trait
//! method, so the backend's own transaction mechanism provides the
//! guarantee — the services never compensate.

pub mod in_memory;

pub use in_memory::InMemoryStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::AuditEntry;
use crate::catalog::{Category, Product, ProductFilter};
use crate::core::ShopResult;
use crate::customers::Customer;
use crate::orders::{Order, OrderFilter, OrderStatus};

/// Product and category persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn insert_product(&self, product: Product) -> ShopResult<Product>;

    async fn get_product(&self, id: &Uuid) -> ShopResult<Option<Product>>;

    /// Filtered, paginated listing ordered by creation time then id.
    /// `page_size` is the already-clamped bound the caller settled on.
    async fn list_products(
        &self,
        filter: &ProductFilter,
        page_size: usize,
    ) -> ShopResult<Vec<Product>>;

    /// Full replace of an existing product (including its size set).
    /// Fails with `NotFoundError` when the id is unknown.
    async fn replace_product(&self, product: Product) -> ShopResult<Product>;

    /// Fails with `ConflictError` while any order item references the
    /// product: ledger history must never dangle.
    async fn delete_product(&self, id: &Uuid) -> ShopResult<()>;

    /// Atomic admin stock override with a zero floor; returns the new
    /// counter value.
    async fn adjust_stock(&self, id: &Uuid, size: Option<&str>, delta: i64) -> ShopResult<u32>;

    async fn insert_category(&self, category: Category) -> ShopResult<Category>;

    async fn get_category(&self, id: &Uuid) -> ShopResult<Option<Category>>;

    async fn list_categories(&self) -> ShopResult<Vec<Category>>;

    async fn replace_category(&self, category: Category) -> ShopResult<Category>;

    /// Fails with `ConflictError` while any product references the category.
    async fn delete_category(&self, id: &Uuid) -> ShopResult<()>;
}

/// Order persistence.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order and decrement stock for every line item as one
    /// atomic unit, fail-closed: any line with insufficient stock rejects
    /// the whole order with `StockError` and nothing is written.
    ///
    /// When the order carries an idempotency key already present in the
    /// store, the previously persisted order is returned and no stock
    /// moves — resubmissions are harmless.
    async fn commit_order(&self, order: Order) -> ShopResult<Order>;

    /// Apply a status transition atomically: legality is checked against
    /// the current row, and a transition to `Cancelled` releases the
    /// order's stock in the same unit.
    async fn transition_order(&self, id: &Uuid, next: OrderStatus) -> ShopResult<Order>;

    async fn get_order(&self, id: &Uuid) -> ShopResult<Option<Order>>;

    /// Filtered, paginated listing, newest first.
    async fn list_orders(&self, filter: &OrderFilter, page_size: usize) -> ShopResult<Vec<Order>>;

    async fn find_by_idempotency_key(&self, key: &str) -> ShopResult<Option<Order>>;

    /// All orders with `created_at` in `[start, end)`, ordered by creation
    /// time then id — the analytics read path.
    async fn orders_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ShopResult<Vec<Order>>;
}

/// Customer account persistence.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Fails with `ConflictError` on a duplicate email.
    async fn insert_customer(&self, customer: Customer) -> ShopResult<Customer>;

    async fn get_customer(&self, id: &Uuid) -> ShopResult<Option<Customer>>;

    async fn list_customers(&self) -> ShopResult<Vec<Customer>>;
}

/// Append-only audit trail persistence.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append(&self, entry: AuditEntry) -> ShopResult<AuditEntry>;

    /// Most recent entries, newest first.
    async fn recent(&self, limit: usize) -> ShopResult<Vec<AuditEntry>>;
}
