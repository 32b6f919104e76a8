//! Product and size-variant records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::core::{ConflictError, Money, ShopResult, ValidationError};

/// One size variant of a product.
///
/// When a product declares variants, these counters are the authoritative
/// stock; the aggregate `Product::stock` only applies to size-less products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSize {
    pub size: String,
    pub stock: u32,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,

    /// Listed price. Mutable catalog state — orders freeze their own copy.
    pub price: Money,

    /// Optional promotional price; when present it is the selling price
    /// and must not exceed `price`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_price: Option<Money>,

    /// Aggregate stock, authoritative only when `sizes` is empty
    pub stock: u32,

    /// Size variants, unique by label, in display order
    #[serde(default)]
    pub sizes: Vec<ProductSize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,

    /// Allows a printed name on the unit at sale time
    #[serde(default)]
    pub allow_flocage: bool,

    /// Allows an engraved number on the unit at sale time
    #[serde(default)]
    pub allow_gravure: bool,

    /// Shown on the storefront's featured rail
    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub images: Vec<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The price a new sale pays right now.
    pub fn selling_price(&self) -> Money {
        self.discount_price.unwrap_or(self.price)
    }

    pub fn has_sizes(&self) -> bool {
        !self.sizes.is_empty()
    }

    pub fn size(&self, label: &str) -> Option<&ProductSize> {
        self.sizes.iter().find(|s| s.size == label)
    }

    pub fn size_mut(&mut self, label: &str) -> Option<&mut ProductSize> {
        self.sizes.iter_mut().find(|s| s.size == label)
    }

    /// Units available for the given variant, or the aggregate counter for
    /// size-less products. `None` when the label is not a declared variant.
    pub fn available(&self, size: Option<&str>) -> Option<u32> {
        match size {
            Some(label) => self.size(label).map(|s| s.stock),
            None => {
                if self.has_sizes() {
                    Some(self.sizes.iter().map(|s| s.stock).sum())
                } else {
                    Some(self.stock)
                }
            }
        }
    }
}

/// Input for creating or fully updating a product.
///
/// Supplying `sizes` on an update replaces the whole variant set
/// (delete-all-then-insert semantics; partial size edits are not supported).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub discount_price: Option<Money>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sizes: Vec<ProductSize>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub allow_flocage: bool,
    #[serde(default)]
    pub allow_gravure: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub images: Vec<String>,
}

impl ProductDraft {
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty").into());
        }
        if self.price.is_negative() {
            return Err(ValidationError::field("price", "must not be negative").into());
        }
        if let Some(discount) = self.discount_price {
            if discount.is_negative() {
                return Err(
                    ValidationError::field("discount_price", "must not be negative").into(),
                );
            }
            if discount > self.price {
                return Err(ValidationError::field(
                    "discount_price",
                    "must not exceed the listed price",
                )
                .into());
            }
        }
        let mut labels = HashSet::new();
        for size in &self.sizes {
            if size.size.trim().is_empty() {
                return Err(ValidationError::field("sizes", "size labels must not be empty").into());
            }
            if !labels.insert(size.size.as_str()) {
                return Err(ConflictError::DuplicateSizeLabel {
                    label: size.size.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Materialize a new product from this draft.
    pub fn into_product(self, now: DateTime<Utc>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            price: self.price,
            discount_price: self.discount_price,
            stock: self.stock,
            sizes: self.sizes,
            category_id: self.category_id,
            allow_flocage: self.allow_flocage,
            allow_gravure: self.allow_gravure,
            featured: self.featured,
            images: self.images,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply this draft over an existing product, preserving identity and
    /// creation time. The supplied `sizes` set replaces the old one.
    pub fn apply_to(self, existing: &Product, now: DateTime<Utc>) -> Product {
        Product {
            id: existing.id,
            name: self.name,
            description: self.description,
            price: self.price,
            discount_price: self.discount_price,
            stock: self.stock,
            sizes: self.sizes,
            category_id: self.category_id,
            allow_flocage: self.allow_flocage,
            allow_gravure: self.allow_gravure,
            featured: self.featured,
            images: self.images,
            created_at: existing.created_at,
            updated_at: now,
        }
    }
}

/// Listing filter for storefront and admin projections
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    /// Restrict to one category
    pub category_id: Option<Uuid>,

    /// Restrict to the storefront's featured rail
    pub featured: Option<bool>,

    /// Case-insensitive substring match on name and description
    pub search: Option<String>,

    /// 1-based page number
    pub page: Option<usize>,

    /// Page size; the service clamps this to the configured bound
    pub page_size: Option<usize>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category_id) = self.category_id {
            if product.category_id != Some(category_id) {
                return false;
            }
        }
        if let Some(featured) = self.featured {
            if product.featured != featured {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = product.name.to_lowercase().contains(&needle)
                || product.description.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}
