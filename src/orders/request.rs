//! Order creation requests and listing filters
//!
//! A request is untrusted input: the ledger re-derives prices from the
//! catalog (except the POS operator override) and validates every line
//! before anything is written.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::Money;
use crate::orders::{DeliveryType, OrderChannel, OrderCustomer, OrderStatus, PaymentMethod};

fn default_channel() -> OrderChannel {
    OrderChannel::Web
}

/// One requested line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRequest {
    pub product_id: Uuid,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub custom_name: Option<String>,
    #[serde(default)]
    pub custom_number: Option<String>,

    /// Operator-entered unit price. Only honored on the POS channel;
    /// web checkouts supplying it are rejected outright.
    #[serde(default)]
    pub unit_price: Option<Money>,
}

/// A checkout or POS submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub customer: OrderCustomer,
    #[serde(default = "default_channel")]
    pub channel: OrderChannel,
    pub payment_method: PaymentMethod,
    pub delivery: DeliveryType,
    pub items: Vec<OrderItemRequest>,

    /// Client-supplied token deduplicating retried submissions: the same
    /// key always yields the same persisted order and a single stock
    /// decrement.
    #[serde(default)]
    pub idempotency_key: Option<String>,
}

/// Listing filter for the admin order views.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,

    /// 1-based page number
    pub page: Option<usize>,

    /// Page size; the ledger clamps this to the configured bound
    pub page_size: Option<usize>,
}
