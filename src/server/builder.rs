//! ServerBuilder for wiring config, storage and services into a router
//!
//! # Example
//!
//! ```ignore
//! let app = ServerBuilder::new()
//!     .with_config(StoreConfig::from_yaml_file("boutik.yaml")?)
//!     .with_backend(InMemoryStore::new())
//!     .build()?;
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

use std::sync::Arc;

use anyhow::Result;
use axum::Router;

use crate::analytics::AnalyticsService;
use crate::audit::AuditTrail;
use crate::catalog::CatalogService;
use crate::config::StoreConfig;
use crate::customers::CustomerDirectory;
use crate::orders::OrderLedger;
use crate::server::handlers::AppState;
use crate::server::router::build_router;
use crate::storage::{AuditStore, CatalogStore, CustomerStore, OrderStore};

/// Builder for the storefront HTTP server.
pub struct ServerBuilder {
    config: StoreConfig,
    catalog_store: Option<Arc<dyn CatalogStore>>,
    order_store: Option<Arc<dyn OrderStore>>,
    customer_store: Option<Arc<dyn CustomerStore>>,
    audit_store: Option<Arc<dyn AuditStore>>,
}

impl ServerBuilder {
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            catalog_store: None,
            order_store: None,
            customer_store: None,
            audit_store: None,
        }
    }

    /// Set the configuration (defaults otherwise).
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the storage backend (required). One backend instance serves
    /// every store trait; clones share state.
    pub fn with_backend<B>(mut self, backend: B) -> Self
    where
        B: CatalogStore + OrderStore + CustomerStore + AuditStore + Clone + 'static,
    {
        self.catalog_store = Some(Arc::new(backend.clone()));
        self.order_store = Some(Arc::new(backend.clone()));
        self.customer_store = Some(Arc::new(backend.clone()));
        self.audit_store = Some(Arc::new(backend));
        self
    }

    /// Wire the services and produce the final router.
    pub fn build(self) -> Result<Router> {
        let catalog_store = self
            .catalog_store
            .ok_or_else(|| anyhow::anyhow!("a storage backend is required. Call .with_backend()"))?;
        let order_store = self
            .order_store
            .ok_or_else(|| anyhow::anyhow!("a storage backend is required. Call .with_backend()"))?;
        let customer_store = self
            .customer_store
            .ok_or_else(|| anyhow::anyhow!("a storage backend is required. Call .with_backend()"))?;
        let audit_store = self
            .audit_store
            .ok_or_else(|| anyhow::anyhow!("a storage backend is required. Call .with_backend()"))?;

        let config = Arc::new(self.config);
        let audit = AuditTrail::new(audit_store);

        let catalog = CatalogService::new(catalog_store.clone(), audit.clone(), config.clone());
        let ledger = OrderLedger::new(
            order_store.clone(),
            catalog_store.clone(),
            audit.clone(),
            config.clone(),
        );
        let analytics = AnalyticsService::new(order_store, catalog_store, customer_store.clone());
        let customers = CustomerDirectory::new(customer_store, audit.clone());

        Ok(build_router(AppState {
            catalog,
            ledger,
            analytics,
            customers,
            audit,
            config,
        }))
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
