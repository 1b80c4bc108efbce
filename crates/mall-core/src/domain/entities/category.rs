//! Category entity.

use crate::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Database-assigned identifier.
    pub id: CategoryId,

    /// Unique display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Optional image URL.
    pub image_url: Option<String>,

    /// Whether the category is visible in the catalog.
    pub is_active: bool,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Creates a new, not yet persisted, active category.
    #[must_use]
    pub fn new(name: String, description: Option<String>, image_url: Option<String>) -> Self {
        Self {
            id: CategoryId::default(),
            name,
            description,
            image_url,
            is_active: true,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Applies an edit and stamps `updated_at`.
    pub fn apply_update(
        &mut self,
        name: String,
        description: Option<String>,
        image_url: Option<String>,
        is_active: bool,
    ) {
        self.name = name;
        self.description = description;
        self.image_url = image_url;
        self.is_active = is_active;
        self.updated_at = Some(Utc::now());
    }
}
