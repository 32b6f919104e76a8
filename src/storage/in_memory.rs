//! In-memory storage backend
//!
//! The reference implementation of the storage traits, used by tests and
//! development servers. One `RwLock` guards the whole store, so every
//! multi-row write (order commit + stock decrements, cancellation +
//! restock) runs under a single write guard: concurrent reservations
//! serialize and a failed commit leaves no partial state behind.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::audit::AuditEntry;
use crate::catalog::{Category, Product, ProductFilter};
use crate::core::{ConflictError, NotFoundError, ShopResult, StorageError};
use crate::customers::Customer;
use crate::inventory;
use crate::orders::{Order, OrderFilter, OrderStatus};
use crate::storage::{AuditStore, CatalogStore, CustomerStore, OrderStore};

const BACKEND: &str = "in-memory";

#[derive(Default)]
struct StoreState {
    products: HashMap<Uuid, Product>,
    categories: HashMap<Uuid, Category>,
    orders: HashMap<Uuid, Order>,
    /// idempotency key -> order id
    order_keys: HashMap<String, Uuid>,
    customers: HashMap<Uuid, Customer>,
    audit: Vec<AuditEntry>,
}

/// In-memory store implementing every storage trait.
///
/// Cloning shares the underlying state, so one instance can back all the
/// services of a server.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_state(&self) -> ShopResult<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|e| {
            StorageError::Unavailable {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    fn write_state(&self) -> ShopResult<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|e| {
            StorageError::Unavailable {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

fn paginate<T>(rows: Vec<T>, page: Option<usize>, page_size: usize) -> Vec<T> {
    let page = page.unwrap_or(1).max(1);
    let skip = (page - 1).saturating_mul(page_size);
    rows.into_iter().skip(skip).take(page_size).collect()
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn insert_product(&self, product: Product) -> ShopResult<Product> {
        let mut state = self.write_state()?;
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: &Uuid) -> ShopResult<Option<Product>> {
        Ok(self.read_state()?.products.get(id).cloned())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
        page_size: usize,
    ) -> ShopResult<Vec<Product>> {
        let state = self.read_state()?;
        let mut rows: Vec<Product> = state
            .products
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        rows.sort_by_key(|p| (p.created_at, p.id));
        Ok(paginate(rows, filter.page, page_size))
    }

    async fn replace_product(&self, product: Product) -> ShopResult<Product> {
        let mut state = self.write_state()?;
        if !state.products.contains_key(&product.id) {
            return Err(NotFoundError::Product { id: product.id }.into());
        }
        state.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn delete_product(&self, id: &Uuid) -> ShopResult<()> {
        let mut state = self.write_state()?;
        if !state.products.contains_key(id) {
            return Err(NotFoundError::Product { id: *id }.into());
        }
        let referenced = state
            .orders
            .values()
            .any(|o| o.items.iter().any(|item| item.product_id == *id));
        if referenced {
            return Err(ConflictError::ProductReferenced { id: *id }.into());
        }
        state.products.remove(id);
        Ok(())
    }

    async fn adjust_stock(&self, id: &Uuid, size: Option<&str>, delta: i64) -> ShopResult<u32> {
        let mut state = self.write_state()?;
        let product = state
            .products
            .get_mut(id)
            .ok_or(NotFoundError::Product { id: *id })?;
        inventory::adjust(product, size, delta)
    }

    async fn insert_category(&self, category: Category) -> ShopResult<Category> {
        let mut state = self.write_state()?;
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: &Uuid) -> ShopResult<Option<Category>> {
        Ok(self.read_state()?.categories.get(id).cloned())
    }

    async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        let state = self.read_state()?;
        let mut rows: Vec<Category> = state.categories.values().cloned().collect();
        rows.sort_by_key(|c| (c.created_at, c.id));
        Ok(rows)
    }

    async fn replace_category(&self, category: Category) -> ShopResult<Category> {
        let mut state = self.write_state()?;
        if !state.categories.contains_key(&category.id) {
            return Err(NotFoundError::Category { id: category.id }.into());
        }
        state.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn delete_category(&self, id: &Uuid) -> ShopResult<()> {
        let mut state = self.write_state()?;
        if !state.categories.contains_key(id) {
            return Err(NotFoundError::Category { id: *id }.into());
        }
        let in_use = state
            .products
            .values()
            .any(|p| p.category_id == Some(*id));
        if in_use {
            return Err(ConflictError::CategoryInUse { id: *id }.into());
        }
        state.categories.remove(id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn commit_order(&self, order: Order) -> ShopResult<Order> {
        let mut state = self.write_state()?;

        // Resubmission of an already-committed attempt: return the
        // original order, decrement nothing.
        if let Some(key) = &order.idempotency_key {
            if let Some(existing_id) = state.order_keys.get(key) {
                if let Some(existing) = state.orders.get(existing_id) {
                    return Ok(existing.clone());
                }
            }
        }

        // Fail-closed reservation staged against copies: only when every
        // claim is covered do the mutated rows replace the originals.
        let claims = inventory::claims_for(&order.items);
        let mut staged: HashMap<Uuid, Product> = HashMap::new();
        for claim in &claims {
            if !staged.contains_key(&claim.product_id) {
                let product = state
                    .products
                    .get(&claim.product_id)
                    .cloned()
                    .ok_or(NotFoundError::Product {
                        id: claim.product_id,
                    })?;
                staged.insert(claim.product_id, product);
            }
        }
        for claim in &claims {
            let product = staged
                .get_mut(&claim.product_id)
                .ok_or(NotFoundError::Product {
                    id: claim.product_id,
                })?;
            inventory::reserve(product, claim)?;
        }

        for (id, product) in staged {
            state.products.insert(id, product);
        }
        if let Some(key) = &order.idempotency_key {
            state.order_keys.insert(key.clone(), order.id);
        }
        state.orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn transition_order(&self, id: &Uuid, next: OrderStatus) -> ShopResult<Order> {
        let mut state = self.write_state()?;
        let order = state
            .orders
            .get(id)
            .ok_or(NotFoundError::Order { id: *id })?;
        let from = order.status;
        if !from.can_transition_to(next) {
            return Err(crate::core::InvalidTransitionError {
                order_id: *id,
                from,
                to: next,
            }
            .into());
        }

        // Cancellation is only legal from stock-holding states; return
        // the reserved units in the same write.
        if next == OrderStatus::Cancelled {
            let claims = inventory::claims_for(&order.items);
            for claim in claims {
                if let Some(product) = state.products.get_mut(&claim.product_id) {
                    inventory::release(product, &claim);
                }
            }
        }

        let order = state.orders.get_mut(id).ok_or(NotFoundError::Order { id: *id })?;
        order.status = next;
        Ok(order.clone())
    }

    async fn get_order(&self, id: &Uuid) -> ShopResult<Option<Order>> {
        Ok(self.read_state()?.orders.get(id).cloned())
    }

    async fn list_orders(&self, filter: &OrderFilter, page_size: usize) -> ShopResult<Vec<Order>> {
        let state = self.read_state()?;
        let mut rows: Vec<Order> = state
            .orders
            .values()
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect();
        // Newest first for the admin views
        rows.sort_by_key(|o| (std::cmp::Reverse(o.created_at), o.id));
        Ok(paginate(rows, filter.page, page_size))
    }

    async fn find_by_idempotency_key(&self, key: &str) -> ShopResult<Option<Order>> {
        let state = self.read_state()?;
        Ok(state
            .order_keys
            .get(key)
            .and_then(|id| state.orders.get(id))
            .cloned())
    }

    async fn orders_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> ShopResult<Vec<Order>> {
        let state = self.read_state()?;
        let mut rows: Vec<Order> = state
            .orders
            .values()
            .filter(|o| o.created_at >= start && o.created_at < end)
            .cloned()
            .collect();
        rows.sort_by_key(|o| (o.created_at, o.id));
        Ok(rows)
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn insert_customer(&self, customer: Customer) -> ShopResult<Customer> {
        let mut state = self.write_state()?;
        let duplicate = state
            .customers
            .values()
            .any(|c| c.email.eq_ignore_ascii_case(&customer.email));
        if duplicate {
            return Err(ConflictError::DuplicateEmail {
                email: customer.email,
            }
            .into());
        }
        state.customers.insert(customer.id, customer.clone());
        Ok(customer)
    }

    async fn get_customer(&self, id: &Uuid) -> ShopResult<Option<Customer>> {
        Ok(self.read_state()?.customers.get(id).cloned())
    }

    async fn list_customers(&self) -> ShopResult<Vec<Customer>> {
        let state = self.read_state()?;
        let mut rows: Vec<Customer> = state.customers.values().cloned().collect();
        rows.sort_by_key(|c| (c.created_at, c.id));
        Ok(rows)
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn append(&self, entry: AuditEntry) -> ShopResult<AuditEntry> {
        let mut state = self.write_state()?;
        state.audit.push(entry.clone());
        Ok(entry)
    }

    async fn recent(&self, limit: usize) -> ShopResult<Vec<AuditEntry>> {
        let state = self.read_state()?;
        Ok(state.audit.iter().rev().take(limit).cloned().collect())
    }
}
