//! Registered customer accounts
//!
//! Authentication itself is delegated to an external identity provider;
//! the core only keeps the account records the order ledger references and
//! the analytics aggregator counts (new customers, conversion rate).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::audit::AuditTrail;
use crate::core::{NotFoundError, ShopResult, ValidationError};
use crate::storage::CustomerStore;

/// A registered customer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for registering a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

impl CustomerDraft {
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty").into());
        }
        if !self.email.contains('@') {
            return Err(ValidationError::field("email", "must be an email address").into());
        }
        Ok(())
    }

    pub fn into_customer(self, now: DateTime<Utc>) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: self.name,
            email: self.email.trim().to_lowercase(),
            phone: self.phone,
            created_at: now,
        }
    }
}

/// Account registry service.
#[derive(Clone)]
pub struct CustomerDirectory {
    store: Arc<dyn CustomerStore>,
    audit: AuditTrail,
}

impl CustomerDirectory {
    pub fn new(store: Arc<dyn CustomerStore>, audit: AuditTrail) -> Self {
        Self { store, audit }
    }

    pub async fn register(&self, draft: CustomerDraft) -> ShopResult<Customer> {
        draft.validate()?;
        let customer = draft.into_customer(Utc::now());
        let customer = self.store.insert_customer(customer).await?;
        tracing::info!(customer_id = %customer.id, "customer registered");
        self.audit
            .record(
                "storefront",
                "customer.registered",
                format!("Registered account for {}", customer.email),
            )
            .await;
        Ok(customer)
    }

    pub async fn get(&self, id: Uuid) -> ShopResult<Customer> {
        self.store
            .get_customer(&id)
            .await?
            .ok_or_else(|| NotFoundError::Customer { id }.into())
    }

    pub async fn list(&self) -> ShopResult<Vec<Customer>> {
        self.store.list_customers().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_validation() {
        let ok = CustomerDraft {
            name: "Awa Ndiaye".to_string(),
            email: "awa@example.sn".to_string(),
            phone: None,
        };
        assert!(ok.validate().is_ok());

        let bad_email = CustomerDraft {
            name: "Awa Ndiaye".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
        };
        assert!(bad_email.validate().is_err());
    }

    #[test]
    fn test_email_normalized_on_materialize() {
        let customer = CustomerDraft {
            name: "Awa Ndiaye".to_string(),
            email: " Awa@Example.SN ".to_string(),
            phone: None,
        }
        .into_customer(Utc::now());
        assert_eq!(customer.email, "awa@example.sn");
    }
}
