//! Category records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::{ShopResult, ValidationError};

/// A product category (one-to-many with products).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or updating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl CategoryDraft {
    pub fn validate(&self) -> ShopResult<()> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::field("name", "must not be empty").into());
        }
        Ok(())
    }

    pub fn into_category(self, now: DateTime<Utc>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: self.name,
            description: self.description,
            image: self.image,
            created_at: now,
        }
    }

    pub fn apply_to(self, existing: &Category) -> Category {
        Category {
            id: existing.id,
            name: self.name,
            description: self.description,
            image: self.image,
            created_at: existing.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        let draft = CategoryDraft {
            name: "   ".to_string(),
            description: String::new(),
            image: None,
        };
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_apply_to_preserves_identity() {
        let original = CategoryDraft {
            name: "Maillots".to_string(),
            description: String::new(),
            image: None,
        }
        .into_category(Utc::now());

        let updated = CategoryDraft {
            name: "Maillots officiels".to_string(),
            description: "Collection club".to_string(),
            image: None,
        }
        .apply_to(&original);

        assert_eq!(updated.id, original.id);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.name, "Maillots officiels");
    }
}
