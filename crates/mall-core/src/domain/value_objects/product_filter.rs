//! Product filter criteria.

use crate::{CategoryId, MallError, Product};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Field a filtered product listing is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Order by product name.
    #[default]
    Name,
    /// Order by unit price.
    Price,
    /// Order by creation time.
    CreatedAt,
}

impl SortField {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Price => "price",
            Self::CreatedAt => "created_at",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = MallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            "createdat" | "created_at" => Ok(Self::CreatedAt),
            other => Err(MallError::validation(format!("Unknown sort field: {}", other))),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending.
    #[default]
    Asc,
    /// Descending.
    Desc,
}

impl SortDirection {
    /// Stable lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = MallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(MallError::validation(format!("Unknown sort direction: {}", other))),
        }
    }
}

/// Criteria for a filtered, sorted, optionally paged product listing.
///
/// Every field is optional. Absent criteria do not constrain the result.
/// Paging is 1-based and only applies when both `page` and `page_size`
/// are positive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Substring matched against name or description.
    pub name: Option<String>,
    /// Restrict to one category.
    pub category_id: Option<CategoryId>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
    /// `Some(true)` keeps stocked products, `Some(false)` keeps sold-out ones.
    pub in_stock: Option<bool>,
    /// Sort field, name when absent.
    pub sort_by: Option<SortField>,
    /// Sort direction, ascending when absent.
    pub sort_direction: Option<SortDirection>,
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
}

impl ProductFilter {
    /// Returns the trimmed name criterion, ignoring blank input.
    #[must_use]
    pub fn name_term(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Returns `(offset, limit)` when paging applies.
    #[must_use]
    pub fn pagination(&self) -> Option<(usize, usize)> {
        match (self.page, self.page_size) {
            (Some(page), Some(size)) if page > 0 && size > 0 => {
                Some(((page as usize - 1) * size as usize, size as usize))
            }
            _ => None,
        }
    }

    /// Returns the effective sort field and direction.
    #[must_use]
    pub fn sort(&self) -> (SortField, SortDirection) {
        (
            self.sort_by.unwrap_or_default(),
            self.sort_direction.unwrap_or_default(),
        )
    }

    /// Returns true if `product` satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(term) = self.name_term() {
            let needle = term.to_lowercase();
            let in_name = product.name.to_lowercase().contains(&needle);
            let in_description = product
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(&needle));
            if !in_name && !in_description {
                return false;
            }
        }
        if self.category_id.is_some_and(|id| id != product.category_id) {
            return false;
        }
        if self.min_price.is_some_and(|min| product.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| product.price > max) {
            return false;
        }
        if self.in_stock.is_some_and(|wanted| wanted != product.in_stock()) {
            return false;
        }
        true
    }

    /// Orders two products by the effective sort. Ties fall back to id.
    #[must_use]
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let (field, direction) = self.sort();
        let ordering = match field {
            SortField::Name => a.name.cmp(&b.name),
            SortField::Price => a.price.cmp(&b.price),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        let ordering = match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    }

    /// Applies the filter to an in-memory listing.
    ///
    /// Returns the requested page together with the total number of matches.
    #[must_use]
    pub fn apply(&self, products: impl IntoIterator<Item = Product>) -> (Vec<Product>, u64) {
        let mut matched: Vec<Product> = products.into_iter().filter(|p| self.matches(p)).collect();
        matched.sort_by(|a, b| self.compare(a, b));
        let total = matched.len() as u64;

        let page = match self.pagination() {
            Some((offset, limit)) => matched.into_iter().skip(offset).take(limit).collect(),
            None => matched,
        };
        (page, total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProductId;

    fn product(id: i32, name: &str, cents: i64, stock: i32, category: i32) -> Product {
        let mut p = Product::new(
            name.to_string(),
            None,
            Decimal::new(cents, 2),
            stock,
            None,
            None,
            CategoryId::new(category),
        );
        p.id = ProductId::new(id);
        p
    }

    fn catalog() -> Vec<Product> {
        vec![
            product(1, "Laptop", 99_900, 4, 1),
            product(2, "Mouse", 1_999, 0, 1),
            product(3, "Desk", 24_900, 2, 2),
            product(4, "Lamp", 3_450, 10, 2),
        ]
    }

    #[test]
    fn test_sort_parsing_is_case_insensitive() {
        assert_eq!("Price".parse::<SortField>().unwrap(), SortField::Price);
        assert_eq!("CREATEDAT".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert_eq!(" DESC ".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert!("rating".parse::<SortField>().is_err());
    }

    #[test]
    fn test_empty_filter_sorts_by_name() {
        let (items, total) = ProductFilter::default().apply(catalog());
        assert_eq!(total, 4);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Desk", "Lamp", "Laptop", "Mouse"]);
    }

    #[test]
    fn test_price_bounds_and_stock() {
        let filter = ProductFilter {
            min_price: Some(Decimal::new(20, 0)),
            max_price: Some(Decimal::new(1000, 0)),
            in_stock: Some(true),
            sort_by: Some(SortField::Price),
            sort_direction: Some(SortDirection::Desc),
            ..ProductFilter::default()
        };
        let (items, total) = filter.apply(catalog());
        assert_eq!(total, 3);
        let ids: Vec<_> = items.iter().map(|p| p.id.into_inner()).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn test_paging_reports_full_total() {
        let filter = ProductFilter {
            page: Some(2),
            page_size: Some(3),
            ..ProductFilter::default()
        };
        let (items, total) = filter.apply(catalog());
        assert_eq!(total, 4);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Mouse");
    }

    #[test]
    fn test_zero_page_disables_paging() {
        let filter = ProductFilter {
            page: Some(0),
            page_size: Some(2),
            ..ProductFilter::default()
        };
        assert!(filter.pagination().is_none());
        assert_eq!(filter.apply(catalog()).0.len(), 4);
    }

    #[test]
    fn test_blank_name_is_ignored() {
        let filter = ProductFilter {
            name: Some("   ".to_string()),
            category_id: Some(CategoryId::new(2)),
            ..ProductFilter::default()
        };
        assert_eq!(filter.name_term(), None);
        assert_eq!(filter.apply(catalog()).1, 2);
    }
}
