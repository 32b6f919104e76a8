//! Append-only admin audit trail
//!
//! Every mutating operation records one human-readable entry. The trail is
//! best-effort: an append failure is logged and swallowed, never rolling
//! back the business write it describes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::ShopResult;
use crate::storage::AuditStore;

/// One audit trail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub id: Uuid,
    /// Who acted: "admin", "storefront" or "pos"
    pub actor: String,
    /// Machine-readable action, e.g. "order.created"
    pub action: String,
    /// Human-readable description
    pub details: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(actor: impl Into<String>, action: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor: actor.into(),
            action: action.into(),
            details: details.into(),
            created_at: Utc::now(),
        }
    }
}

/// Handle services use to write and read the trail.
#[derive(Clone)]
pub struct AuditTrail {
    store: Arc<dyn AuditStore>,
}

impl AuditTrail {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    /// Append an entry. Failures are logged, not propagated.
    pub async fn record(&self, actor: &str, action: &str, details: impl Into<String>) {
        let entry = AuditEntry::new(actor, action, details);
        if let Err(err) = self.store.append(entry).await {
            tracing::warn!(%actor, %action, error = %err, "audit append failed, continuing");
        }
    }

    /// Most recent entries, newest first.
    pub async fn recent(&self, limit: usize) -> ShopResult<Vec<AuditEntry>> {
        self.store.recent(limit).await
    }
}
