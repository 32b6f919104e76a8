//! Order and line-item records, and the order status state machine
//!
//! An [`Order`] is the append-mostly record of one sale, web checkout or
//! in-store POS. Line items freeze the unit price and product name at the
//! time of sale; later catalog edits never reprice history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::core::Money;

/// Lifecycle of an order.
///
/// Transitions are strict single forward steps, plus cancellation while
/// the sale is still reversible:
///
/// ```text
/// PENDING ──▶ PAID ──▶ SHIPPED ──▶ DELIVERED
///    │          │
///    └──────────┴──▶ CANCELLED
/// ```
///
/// Cancelled and Delivered are terminal. Skipping a step
/// (e.g. Pending → Delivered) is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// All statuses in declaration order, for deterministic distributions.
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Paid)
                | (Paid, Shipped)
                | (Shipped, Delivered)
                | (Pending, Cancelled)
                | (Paid, Cancelled)
        )
    }

    /// Statuses whose stock reservation is still releasable.
    ///
    /// Shipped/Delivered orders have left the building; cancellation (and
    /// therefore restocking) is only reachable from these states.
    pub fn holds_stock(self) -> bool {
        matches!(self, OrderStatus::Pending | OrderStatus::Paid)
    }

    /// Statuses that count toward revenue in the analytics aggregator.
    pub fn counts_toward_revenue(self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Shipped | OrderStatus::Delivered
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepted payment methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    Wave,
    #[serde(rename = "Orange Money")]
    OrangeMoney,
    Cash,
    Card,
}

impl PaymentMethod {
    /// All methods in declaration order, for deterministic distributions.
    pub const ALL: [PaymentMethod; 4] = [
        PaymentMethod::Wave,
        PaymentMethod::OrangeMoney,
        PaymentMethod::Cash,
        PaymentMethod::Card,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Wave => "Wave",
            PaymentMethod::OrangeMoney => "Orange Money",
            PaymentMethod::Cash => "Cash",
            PaymentMethod::Card => "Card",
        }
    }
}

/// How the order reaches the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryType {
    HomeDelivery,
    Pickup,
}

/// Where the sale originated.
///
/// POS sales are entered by a trusted operator at the counter: payment is
/// collected immediately (orders start [`OrderStatus::Paid`]) and the
/// operator may override unit prices. Web orders start
/// [`OrderStatus::Pending`] and always price from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderChannel {
    Web,
    Pos,
}

impl OrderChannel {
    pub fn initial_status(self) -> OrderStatus {
        match self {
            OrderChannel::Web => OrderStatus::Pending,
            OrderChannel::Pos => OrderStatus::Paid,
        }
    }

    pub fn actor(self) -> &'static str {
        match self {
            OrderChannel::Web => "storefront",
            OrderChannel::Pos => "pos",
        }
    }
}

/// The buyer's identity: a registered account or freeform guest fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OrderCustomer {
    Account {
        customer_id: Uuid,
    },
    Guest {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        phone: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        address: Option<String>,
    },
}

impl OrderCustomer {
    /// Guest identities need a name plus at least one contact channel.
    pub fn has_identity(&self) -> bool {
        match self {
            OrderCustomer::Account { .. } => true,
            OrderCustomer::Guest {
                name, email, phone, ..
            } => !name.trim().is_empty() && (email.is_some() || phone.is_some()),
        }
    }

    /// The registered account id, when there is one.
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            OrderCustomer::Account { customer_id } => Some(*customer_id),
            OrderCustomer::Guest { .. } => None,
        }
    }
}

/// One product-and-quantity entry within an order.
///
/// `unit_price` and `product_name` are frozen copies captured at order
/// creation, never live references into the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_number: Option<String>,
}

impl OrderItem {
    pub fn line_total(&self) -> Money {
        self.unit_price.times(self.quantity)
    }
}

/// One sale, web or POS.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer: OrderCustomer,
    pub channel: OrderChannel,
    pub payment_method: PaymentMethod,
    pub delivery: DeliveryType,
    pub delivery_fee: Money,
    pub status: OrderStatus,
    pub total: Money,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
}

impl Order {
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// The total the ledger invariant demands:
    /// `Σ(unit_price × quantity) + delivery_fee`.
    pub fn computed_total(&self) -> Money {
        self.subtotal() + self.delivery_fee
    }

    pub fn totals_consistent(&self) -> bool {
        self.total == self.computed_total()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_price: i64, quantity: u32) -> OrderItem {
        OrderItem {
            id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            product_name: "Maillot domicile".to_string(),
            quantity,
            unit_price: Money::from_minor(unit_price),
            size: None,
            custom_name: None,
            custom_number: None,
        }
    }

    #[test]
    fn test_forward_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Paid));
        assert!(Paid.can_transition_to(Shipped));
        assert!(Shipped.can_transition_to(Delivered));
    }

    #[test]
    fn test_skips_are_rejected() {
        use OrderStatus::*;
        assert!(!Pending.can_transition_to(Shipped));
        assert!(!Pending.can_transition_to(Delivered));
        assert!(!Paid.can_transition_to(Delivered));
    }

    #[test]
    fn test_cancellation_only_while_stock_is_held() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Paid.can_transition_to(Cancelled));
        assert!(!Shipped.can_transition_to(Cancelled));
        assert!(!Delivered.can_transition_to(Cancelled));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        use OrderStatus::*;
        for next in OrderStatus::ALL {
            assert!(!Delivered.can_transition_to(next));
            assert!(!Cancelled.can_transition_to(next));
        }
    }

    #[test]
    fn test_no_backward_moves() {
        use OrderStatus::*;
        assert!(!Paid.can_transition_to(Pending));
        assert!(!Shipped.can_transition_to(Paid));
    }

    #[test]
    fn test_revenue_statuses() {
        assert!(!OrderStatus::Pending.counts_toward_revenue());
        assert!(OrderStatus::Paid.counts_toward_revenue());
        assert!(OrderStatus::Shipped.counts_toward_revenue());
        assert!(OrderStatus::Delivered.counts_toward_revenue());
        assert!(!OrderStatus::Cancelled.counts_toward_revenue());
    }

    #[test]
    fn test_status_serializes_screaming() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"PENDING\"");
        let json = serde_json::to_string(&DeliveryType::HomeDelivery).unwrap();
        assert_eq!(json, "\"HOME_DELIVERY\"");
        let json = serde_json::to_string(&PaymentMethod::OrangeMoney).unwrap();
        assert_eq!(json, "\"Orange Money\"");
    }

    #[test]
    fn test_guest_identity_rules() {
        let ok = OrderCustomer::Guest {
            name: "Awa Ndiaye".to_string(),
            email: None,
            phone: Some("+221770000000".to_string()),
            address: None,
        };
        assert!(ok.has_identity());

        let no_contact = OrderCustomer::Guest {
            name: "Awa Ndiaye".to_string(),
            email: None,
            phone: None,
            address: Some("Dakar".to_string()),
        };
        assert!(!no_contact.has_identity());

        let blank_name = OrderCustomer::Guest {
            name: "  ".to_string(),
            email: Some("awa@example.sn".to_string()),
            phone: None,
            address: None,
        };
        assert!(!blank_name.has_identity());
    }

    #[test]
    fn test_total_invariant() {
        let order = Order {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            customer: OrderCustomer::Account {
                customer_id: Uuid::new_v4(),
            },
            channel: OrderChannel::Web,
            payment_method: PaymentMethod::Wave,
            delivery: DeliveryType::HomeDelivery,
            delivery_fee: Money::from_minor(200),
            status: OrderStatus::Pending,
            total: Money::from_minor(2700),
            items: vec![item(1000, 2), item(500, 1)],
            idempotency_key: None,
        };
        assert_eq!(order.subtotal(), Money::from_minor(2500));
        assert!(order.totals_consistent());
    }
}
