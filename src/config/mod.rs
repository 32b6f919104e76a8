//! Configuration loading and management
//!
//! `StoreConfig` is an explicitly loaded value passed into the services
//! that need it — never a module-level singleton — so the fee/threshold
//! rules are testable in isolation with arbitrary values.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::Money;
use crate::orders::DeliveryType;

/// Storefront identity shown to customers and on receipts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreIdentity {
    /// Display name of the shop
    #[serde(default = "defaults::store_name")]
    pub name: String,

    /// ISO 4217 currency label for formatting; amounts themselves are
    /// minor units and currency-agnostic
    #[serde(default = "defaults::currency")]
    pub currency: String,
}

impl Default for StoreIdentity {
    fn default() -> Self {
        Self {
            name: defaults::store_name(),
            currency: defaults::currency(),
        }
    }
}

/// Delivery fee rules applied at order creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPolicy {
    /// Flat fee for home delivery
    #[serde(default = "defaults::flat_fee")]
    pub flat_fee: Money,

    /// Subtotal at or above which home delivery is free; `None` disables
    /// free delivery entirely
    #[serde(default = "defaults::free_threshold")]
    pub free_threshold: Option<Money>,
}

impl DeliveryPolicy {
    /// The fee an order pays: zero for pickup, zero at or above the
    /// free-delivery threshold, otherwise the flat fee.
    pub fn fee_for(&self, delivery: DeliveryType, subtotal: Money) -> Money {
        match delivery {
            DeliveryType::Pickup => Money::ZERO,
            DeliveryType::HomeDelivery => match self.free_threshold {
                Some(threshold) if subtotal >= threshold => Money::ZERO,
                _ => self.flat_fee,
            },
        }
    }
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            flat_fee: defaults::flat_fee(),
            free_threshold: defaults::free_threshold(),
        }
    }
}

/// Pagination bounds for admin/storefront listings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPolicy {
    /// Default and maximum page size; requests asking for more are clamped
    #[serde(default = "defaults::page_size")]
    pub page_size: usize,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            page_size: defaults::page_size(),
        }
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Bind address, e.g. "0.0.0.0:3000"
    #[serde(default = "defaults::bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: defaults::bind(),
        }
    }
}

/// Complete storefront configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub store: StoreIdentity,

    #[serde(default)]
    pub delivery: DeliveryPolicy,

    #[serde(default)]
    pub listing: ListingPolicy,

    #[serde(default)]
    pub server: ServerSettings,
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Clamp a requested page size to the configured bound
    pub fn clamp_page_size(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.listing.page_size)
            .clamp(1, self.listing.page_size)
    }
}

mod defaults {
    use crate::core::Money;

    pub fn store_name() -> String {
        "Boutik".to_string()
    }

    pub fn currency() -> String {
        "XOF".to_string()
    }

    pub fn flat_fee() -> Money {
        Money::from_minor(2000)
    }

    pub fn free_threshold() -> Option<Money> {
        Some(Money::from_minor(50_000))
    }

    pub fn page_size() -> usize {
        50
    }

    pub fn bind() -> String {
        "0.0.0.0:3000".to_string()
    }
}
