//! Product entity.

use crate::{CategoryId, ProductId};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Database-assigned identifier.
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Optional description.
    pub description: Option<String>,

    /// Unit price.
    pub price: Decimal,

    /// Units in stock.
    pub stock_quantity: i32,

    /// Stock keeping unit.
    pub sku: Option<String>,

    /// Optional image URL.
    pub image_url: Option<String>,

    /// Whether the product is listed.
    pub is_active: bool,

    /// Owning category.
    pub category_id: CategoryId,

    /// Name of the owning category, filled in on reads.
    pub category_name: Option<String>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,

    /// Last update timestamp.
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Creates a new, not yet persisted, active product.
    #[must_use]
    pub fn new(
        name: String,
        description: Option<String>,
        price: Decimal,
        stock_quantity: i32,
        sku: Option<String>,
        image_url: Option<String>,
        category_id: CategoryId,
    ) -> Self {
        Self {
            id: ProductId::default(),
            name,
            description,
            price,
            stock_quantity,
            sku,
            image_url,
            is_active: true,
            category_id,
            category_name: None,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Returns true if at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Case-insensitive match against name, description, or SKU.
    #[must_use]
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        self.name.to_lowercase().contains(&needle) || contains(&self.description) || contains(&self.sku)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> Product {
        Product::new(
            "Blue Widget".to_string(),
            Some("A sturdy gadget".to_string()),
            Decimal::new(1999, 2),
            3,
            Some("WID-001".to_string()),
            None,
            CategoryId::new(1),
        )
    }

    #[test]
    fn test_matches_term_is_case_insensitive() {
        let product = widget();
        assert!(product.matches_term("widget"));
        assert!(product.matches_term("GADGET"));
        assert!(product.matches_term("wid-0"));
        assert!(!product.matches_term("laptop"));
    }

    #[test]
    fn test_in_stock() {
        let mut product = widget();
        assert!(product.in_stock());
        product.stock_quantity = 0;
        assert!(!product.in_stock());
    }
}
