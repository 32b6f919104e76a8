//! Catalog service: product and category CRUD with admin auditing

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::audit::AuditTrail;
use crate::catalog::{Category, CategoryDraft, Product, ProductDraft, ProductFilter};
use crate::config::StoreConfig;
use crate::core::{NotFoundError, ShopResult};
use crate::storage::CatalogStore;

/// CRUD operations over the catalog, consumed by both the storefront and
/// the back-office.
#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    audit: AuditTrail,
    config: Arc<StoreConfig>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>, audit: AuditTrail, config: Arc<StoreConfig>) -> Self {
        Self {
            store,
            audit,
            config,
        }
    }

    pub async fn create_product(&self, draft: ProductDraft) -> ShopResult<Product> {
        draft.validate()?;
        if let Some(category_id) = draft.category_id {
            self.require_category(category_id).await?;
        }
        let product = self.store.insert_product(draft.into_product(Utc::now())).await?;
        tracing::info!(product_id = %product.id, name = %product.name, "product created");
        self.audit
            .record(
                "admin",
                "product.created",
                format!("Created product '{}'", product.name),
            )
            .await;
        Ok(product)
    }

    /// Replace a product's fields. A supplied `sizes` set replaces the
    /// whole variant set.
    pub async fn update_product(&self, id: Uuid, draft: ProductDraft) -> ShopResult<Product> {
        draft.validate()?;
        if let Some(category_id) = draft.category_id {
            self.require_category(category_id).await?;
        }
        let existing = self.require_product(id).await?;
        let product = self
            .store
            .replace_product(draft.apply_to(&existing, Utc::now()))
            .await?;
        self.audit
            .record(
                "admin",
                "product.updated",
                format!("Updated product '{}'", product.name),
            )
            .await;
        Ok(product)
    }

    pub async fn delete_product(&self, id: Uuid) -> ShopResult<()> {
        self.store.delete_product(&id).await?;
        self.audit
            .record("admin", "product.deleted", format!("Deleted product {}", id))
            .await;
        Ok(())
    }

    /// Direct stock override, bypassing the order flow.
    pub async fn adjust_stock(
        &self,
        id: Uuid,
        size: Option<&str>,
        delta: i64,
    ) -> ShopResult<u32> {
        let level = self.store.adjust_stock(&id, size, delta).await?;
        tracing::info!(product_id = %id, delta, level, "stock adjusted");
        self.audit
            .record(
                "admin",
                "stock.adjusted",
                match size {
                    Some(size) => format!("Adjusted stock of {} size {} by {}", id, size, delta),
                    None => format!("Adjusted stock of {} by {}", id, delta),
                },
            )
            .await;
        Ok(level)
    }

    pub async fn get_product(&self, id: Uuid) -> ShopResult<Product> {
        self.require_product(id).await
    }

    pub async fn list_products(&self, filter: &ProductFilter) -> ShopResult<Vec<Product>> {
        let page_size = self.config.clamp_page_size(filter.page_size);
        self.store.list_products(filter, page_size).await
    }

    pub async fn create_category(&self, draft: CategoryDraft) -> ShopResult<Category> {
        draft.validate()?;
        let category = self
            .store
            .insert_category(draft.into_category(Utc::now()))
            .await?;
        self.audit
            .record(
                "admin",
                "category.created",
                format!("Created category '{}'", category.name),
            )
            .await;
        Ok(category)
    }

    pub async fn update_category(&self, id: Uuid, draft: CategoryDraft) -> ShopResult<Category> {
        draft.validate()?;
        let existing = self
            .store
            .get_category(&id)
            .await?
            .ok_or(NotFoundError::Category { id })?;
        let category = self.store.replace_category(draft.apply_to(&existing)).await?;
        self.audit
            .record(
                "admin",
                "category.updated",
                format!("Updated category '{}'", category.name),
            )
            .await;
        Ok(category)
    }

    pub async fn delete_category(&self, id: Uuid) -> ShopResult<()> {
        self.store.delete_category(&id).await?;
        self.audit
            .record("admin", "category.deleted", format!("Deleted category {}", id))
            .await;
        Ok(())
    }

    pub async fn get_category(&self, id: Uuid) -> ShopResult<Category> {
        self.store
            .get_category(&id)
            .await?
            .ok_or_else(|| NotFoundError::Category { id }.into())
    }

    pub async fn list_categories(&self) -> ShopResult<Vec<Category>> {
        self.store.list_categories().await
    }

    async fn require_product(&self, id: Uuid) -> ShopResult<Product> {
        self.store
            .get_product(&id)
            .await?
            .ok_or_else(|| NotFoundError::Product { id }.into())
    }

    async fn require_category(&self, id: Uuid) -> ShopResult<Category> {
        self.store
            .get_category(&id)
            .await?
            .ok_or_else(|| NotFoundError::Category { id }.into())
    }
}
