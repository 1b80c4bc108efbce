//! Category DTOs.

use chrono::{DateTime, Utc};
use mall_core::{Category, CategoryId};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Image URL cannot exceed 200 characters"))]
    pub image_url: Option<String>,
}

/// Request to update a category.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 200, message = "Image URL cannot exceed 200 characters"))]
    pub image_url: Option<String>,

    pub is_active: bool,
}

/// Category response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryResponse {
    pub id: CategoryId,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    /// Number of active products in the category.
    pub product_count: u64,
}

impl CategoryResponse {
    /// Builds a response with the given active product count.
    #[must_use]
    pub fn with_count(category: Category, product_count: u64) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            image_url: category.image_url,
            is_active: category.is_active,
            created_at: category.created_at,
            updated_at: category.updated_at,
            product_count,
        }
    }
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self::with_count(category, 0)
    }
}
