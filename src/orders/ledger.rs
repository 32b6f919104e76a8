//! The order ledger service: validated, all-or-nothing order creation and
//! status management
//!
//! Prices are derived from the catalog at creation time and frozen onto
//! the line items; the single exception is the POS channel, where a
//! trusted operator may enter a unit price at the counter.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::AuditTrail;
use crate::config::StoreConfig;
use crate::core::{Money, NotFoundError, ShopResult, ValidationError};
use crate::orders::{
    Order, OrderChannel, OrderFilter, OrderItem, OrderItemRequest, OrderRequest, OrderStatus,
};
use crate::storage::{CatalogStore, OrderStore};

/// The append-mostly record of every sale, web checkout or in-store POS.
#[derive(Clone)]
pub struct OrderLedger {
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn CatalogStore>,
    audit: AuditTrail,
    config: Arc<StoreConfig>,
}

impl OrderLedger {
    pub fn new(
        orders: Arc<dyn OrderStore>,
        catalog: Arc<dyn CatalogStore>,
        audit: AuditTrail,
        config: Arc<StoreConfig>,
    ) -> Self {
        Self {
            orders,
            catalog,
            audit,
            config,
        }
    }

    /// Create an order, all-or-nothing.
    ///
    /// Validation and pricing happen before any write; the storage commit
    /// then persists the order and decrements stock as one atomic unit
    /// (fail-closed — see [`crate::inventory`]). Web orders start
    /// `PENDING`; POS sales start `PAID`, payment having been collected
    /// at the counter.
    pub async fn create_order(&self, request: OrderRequest) -> ShopResult<Order> {
        if request.items.is_empty() {
            return Err(ValidationError::EmptyOrder.into());
        }
        if !request.customer.has_identity() {
            return Err(ValidationError::GuestIdentityMissing.into());
        }

        // Fast path for retried submissions; the commit re-checks the key
        // under its own lock, so a racing duplicate is still collapsed.
        if let Some(key) = &request.idempotency_key {
            if let Some(existing) = self.orders.find_by_idempotency_key(key).await? {
                tracing::debug!(order_id = %existing.id, "idempotent resubmission short-circuited");
                return Ok(existing);
            }
        }

        let mut items = Vec::with_capacity(request.items.len());
        for line in &request.items {
            items.push(self.freeze_line(request.channel, line).await?);
        }

        let subtotal: Money = items.iter().map(OrderItem::line_total).sum();
        let delivery_fee = self.config.delivery.fee_for(request.delivery, subtotal);

        let order = Order {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer: request.customer,
            channel: request.channel,
            payment_method: request.payment_method,
            delivery: request.delivery,
            delivery_fee,
            status: request.channel.initial_status(),
            total: subtotal + delivery_fee,
            items,
            idempotency_key: request.idempotency_key,
        };

        let order = self.orders.commit_order(order).await?;
        tracing::info!(
            order_id = %order.id,
            channel = ?order.channel,
            total = %order.total,
            "order created"
        );
        self.audit
            .record(
                order.channel.actor(),
                "order.created",
                format!(
                    "Order {} created with {} item(s), total {}",
                    order.id,
                    order.items.len(),
                    order.total
                ),
            )
            .await;
        Ok(order)
    }

    /// Admin-triggered status transition. Cancelling a `PENDING`/`PAID`
    /// order releases its stock atomically with the status write.
    pub async fn update_status(&self, id: Uuid, next: OrderStatus) -> ShopResult<Order> {
        let order = self.orders.transition_order(&id, next).await?;
        tracing::info!(order_id = %id, status = %next, "order status changed");
        self.audit
            .record(
                "admin",
                "order.status_changed",
                format!("Order {} moved to {}", id, next),
            )
            .await;
        Ok(order)
    }

    pub async fn get_order(&self, id: Uuid) -> ShopResult<Order> {
        self.orders
            .get_order(&id)
            .await?
            .ok_or_else(|| NotFoundError::Order { id }.into())
    }

    pub async fn list_orders(&self, filter: &OrderFilter) -> ShopResult<Vec<Order>> {
        let page_size = self.config.clamp_page_size(filter.page_size);
        self.orders.list_orders(filter, page_size).await
    }

    /// Validate one requested line against the catalog and freeze its
    /// unit price and product snapshot.
    async fn freeze_line(
        &self,
        channel: OrderChannel,
        line: &OrderItemRequest,
    ) -> ShopResult<OrderItem> {
        if line.quantity < 1 {
            return Err(ValidationError::field("quantity", "must be at least 1").into());
        }
        if line.unit_price.is_some() && channel != OrderChannel::Pos {
            return Err(ValidationError::PriceOverrideForbidden.into());
        }

        let product = self
            .catalog
            .get_product(&line.product_id)
            .await?
            .ok_or(NotFoundError::Product {
                id: line.product_id,
            })?;

        match (&line.size, product.has_sizes()) {
            (Some(label), true) => {
                if product.size(label).is_none() {
                    return Err(ValidationError::field(
                        "size",
                        format!("'{}' is not a declared variant of '{}'", label, product.name),
                    )
                    .into());
                }
            }
            (None, true) => {
                return Err(ValidationError::field(
                    "size",
                    format!("'{}' requires a size", product.name),
                )
                .into());
            }
            (Some(_), false) => {
                return Err(ValidationError::field(
                    "size",
                    format!("'{}' has no size variants", product.name),
                )
                .into());
            }
            (None, false) => {}
        }

        if line.custom_name.is_some() && !product.allow_flocage {
            return Err(ValidationError::field(
                "custom_name",
                format!("'{}' does not allow name printing", product.name),
            )
            .into());
        }
        if line.custom_number.is_some() && !product.allow_gravure {
            return Err(ValidationError::field(
                "custom_number",
                format!("'{}' does not allow engraving", product.name),
            )
            .into());
        }

        let unit_price = match (channel, line.unit_price) {
            (OrderChannel::Pos, Some(price)) => {
                if price.is_negative() {
                    return Err(
                        ValidationError::field("unit_price", "must not be negative").into(),
                    );
                }
                price
            }
            // Registered catalog price, never the client's
            _ => product.selling_price(),
        };

        Ok(OrderItem {
            id: Uuid::new_v4(),
            product_id: product.id,
            product_name: product.name,
            quantity: line.quantity,
            unit_price,
            size: line.size.clone(),
            custom_name: line.custom_name.clone(),
            custom_number: line.custom_number.clone(),
        })
    }
}
