//! Shared fixtures for the integration suites
#![allow(dead_code)]

use std::sync::Arc;

use boutik::prelude::*;

/// Small, round numbers so the scenario arithmetic is easy to follow:
/// flat delivery fee 200, free delivery from a 5 000 subtotal.
pub fn test_config() -> StoreConfig {
    StoreConfig::from_yaml_str(
        r#"
store:
  name: "Boutik Test"
delivery:
  flat_fee: 200
  free_threshold: 5000
"#,
    )
    .expect("static test config parses")
}

/// All services wired over one shared in-memory backend.
pub struct TestApp {
    pub store: InMemoryStore,
    pub catalog: CatalogService,
    pub ledger: OrderLedger,
    pub analytics: AnalyticsService,
    pub customers: CustomerDirectory,
    pub audit: AuditTrail,
}

pub fn test_app(config: StoreConfig) -> TestApp {
    let store = InMemoryStore::new();
    let config = Arc::new(config);
    let audit = AuditTrail::new(Arc::new(store.clone()));
    let catalog = CatalogService::new(Arc::new(store.clone()), audit.clone(), config.clone());
    let ledger = OrderLedger::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        audit.clone(),
        config.clone(),
    );
    let analytics = AnalyticsService::new(
        Arc::new(store.clone()),
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    );
    let customers = CustomerDirectory::new(Arc::new(store.clone()), audit.clone());
    TestApp {
        store,
        catalog,
        ledger,
        analytics,
        customers,
        audit,
    }
}

pub fn product_draft(name: &str, price: i64, stock: u32) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: String::new(),
        price: Money::from_minor(price),
        discount_price: None,
        stock,
        sizes: vec![],
        category_id: None,
        allow_flocage: false,
        allow_gravure: false,
        featured: false,
        images: vec![],
    }
}

pub fn guest() -> OrderCustomer {
    OrderCustomer::Guest {
        name: "Awa Ndiaye".to_string(),
        email: Some("awa@example.sn".to_string()),
        phone: None,
        address: None,
    }
}

pub fn line(product: &Product, quantity: u32) -> OrderItemRequest {
    OrderItemRequest {
        product_id: product.id,
        quantity,
        size: None,
        custom_name: None,
        custom_number: None,
        unit_price: None,
    }
}

/// A web checkout with home delivery, paying by Wave.
pub fn checkout(items: Vec<OrderItemRequest>) -> OrderRequest {
    OrderRequest {
        customer: guest(),
        channel: OrderChannel::Web,
        payment_method: PaymentMethod::Wave,
        delivery: DeliveryType::HomeDelivery,
        items,
        idempotency_key: None,
    }
}

/// A raw ledger row with a controlled creation time and status, committed
/// straight to the store — the analytics suites use this to place orders
/// in past periods. The referenced product must have stock to cover it.
pub fn backdated_order(
    product: &Product,
    quantity: u32,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    customer: OrderCustomer,
) -> Order {
    let item = OrderItem {
        id: Uuid::new_v4(),
        product_id: product.id,
        product_name: product.name.clone(),
        quantity,
        unit_price: product.selling_price(),
        size: None,
        custom_name: None,
        custom_number: None,
    };
    let subtotal = item.line_total();
    Order {
        id: Uuid::new_v4(),
        created_at,
        customer,
        channel: OrderChannel::Web,
        payment_method: PaymentMethod::Wave,
        delivery: DeliveryType::Pickup,
        delivery_fee: Money::ZERO,
        status,
        total: subtotal,
        items: vec![item],
        idempotency_key: None,
    }
}
