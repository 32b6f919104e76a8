//! Order ledger: records, requests and the ledger service

pub mod ledger;
pub mod order;
pub mod request;

pub use ledger::OrderLedger;
pub use order::{
    DeliveryType, Order, OrderChannel, OrderCustomer, OrderItem, OrderStatus, PaymentMethod,
};
pub use request::{OrderFilter, OrderItemRequest, OrderRequest};
