//! Product DTOs.

use chrono::{DateTime, Utc};
use mall_core::{CategoryId, Product, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to create a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,

    #[validate(length(max = 100, message = "SKU cannot exceed 100 characters"))]
    pub sku: Option<String>,

    #[validate(length(max = 500, message = "Image URL cannot exceed 500 characters"))]
    pub image_url: Option<String>,

    pub category_id: CategoryId,
}

/// Request to update a product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    pub description: Option<String>,

    pub price: Decimal,

    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    pub stock_quantity: i32,

    #[validate(length(max = 100, message = "SKU cannot exceed 100 characters"))]
    pub sku: Option<String>,

    #[validate(length(max = 500, message = "Image URL cannot exceed 500 characters"))]
    pub image_url: Option<String>,

    pub is_active: bool,

    pub category_id: CategoryId,
}

/// Product response DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub stock_quantity: i32,
    pub sku: Option<String>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub category_id: CategoryId,
    pub category_name: Option<String>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            stock_quantity: product.stock_quantity,
            sku: product.sku,
            image_url: product.image_url,
            is_active: product.is_active,
            created_at: product.created_at,
            updated_at: product.updated_at,
            category_id: product.category_id,
            category_name: product.category_name,
        }
    }
}

/// One page of a filtered product listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<ProductResponse>,
    /// Matches across all pages.
    pub total_count: u64,
}

impl ProductPage {
    /// Builds a page from repository output.
    #[must_use]
    pub fn new(products: Vec<Product>, total_count: u64) -> Self {
        Self {
            items: products.into_iter().map(ProductResponse::from).collect(),
            total_count,
        }
    }
}
