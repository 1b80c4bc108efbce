//! Cache key generators for consistent key naming.
//!
//! Keys are plain strings of the form `kind:identifier`. Filter keys encode
//! every criterion in a fixed order so that two filters share a key exactly
//! when they select the same page.

use mall_core::{CategoryId, ProductFilter, ProductId};

/// Key for the full category listing.
pub const CATEGORIES_ALL: &str = "categories:all";

/// Key for the full product listing.
pub const PRODUCTS_ALL: &str = "products:all";

/// Generate a cache key for a category by ID.
#[must_use]
pub fn category_by_id(id: CategoryId) -> String {
    format!("category:{}", id)
}

/// Generate a cache key for a product by ID.
#[must_use]
pub fn product_by_id(id: ProductId) -> String {
    format!("product:{}", id)
}

/// Generate a cache key for the products of one category.
#[must_use]
pub fn products_by_category(category_id: CategoryId) -> String {
    format!("products:category:{}", category_id)
}

/// Generate a cache key for a search term.
#[must_use]
pub fn search(term: &str) -> String {
    format!("search:{}", term.trim().to_lowercase())
}

/// Generate a cache key for a product filter.
#[must_use]
pub fn product_filter(filter: &ProductFilter) -> String {
    let (sort_by, sort_direction) = filter.sort();
    let (page, page_size) = match filter.pagination() {
        Some(_) => (
            filter.page.map(|p| p.to_string()).unwrap_or_default(),
            filter.page_size.map(|s| s.to_string()).unwrap_or_default(),
        ),
        None => (String::new(), String::new()),
    };

    let fields = [
        filter
            .name_term()
            .map(|term| escape(&term.to_lowercase()))
            .unwrap_or_default(),
        filter.category_id.map(|id| id.to_string()).unwrap_or_default(),
        filter
            .min_price
            .map(|p| p.normalize().to_string())
            .unwrap_or_default(),
        filter
            .max_price
            .map(|p| p.normalize().to_string())
            .unwrap_or_default(),
        filter.in_stock.map(|s| s.to_string()).unwrap_or_default(),
        sort_by.to_string(),
        sort_direction.to_string(),
        page,
        page_size,
    ];

    format!("filter:{}", fields.join(":"))
}

/// Escapes the separator so free text cannot spill into the next field.
fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace(':', "\\:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use mall_core::{SortDirection, SortField};
    use rust_decimal::Decimal;

    #[test]
    fn test_entity_keys() {
        assert_eq!(category_by_id(CategoryId::new(3)), "category:3");
        assert_eq!(product_by_id(ProductId::new(5)), "product:5");
        assert_eq!(products_by_category(CategoryId::new(2)), "products:category:2");
    }

    #[test]
    fn test_search_key_is_normalized() {
        assert_eq!(search("Widget"), "search:widget");
        assert_eq!(search(" widget "), search("WIDGET"));
    }

    #[test]
    fn test_filter_key_layout() {
        let filter = ProductFilter {
            name: Some(" Lap ".to_string()),
            category_id: Some(CategoryId::new(3)),
            min_price: Some(Decimal::new(1000, 2)),
            in_stock: Some(true),
            sort_by: Some(SortField::Price),
            sort_direction: Some(SortDirection::Desc),
            page: Some(2),
            page_size: Some(20),
            ..ProductFilter::default()
        };
        assert_eq!(product_filter(&filter), "filter:lap:3:10::true:price:desc:2:20");
    }

    #[test]
    fn test_filter_key_equivalences() {
        let explicit = ProductFilter {
            min_price: Some(Decimal::new(10, 0)),
            sort_by: Some(SortField::Name),
            sort_direction: Some(SortDirection::Asc),
            page: Some(0),
            page_size: Some(10),
            ..ProductFilter::default()
        };
        let implicit = ProductFilter {
            min_price: Some(Decimal::new(1000, 2)),
            ..ProductFilter::default()
        };
        assert_eq!(product_filter(&explicit), product_filter(&implicit));
    }

    #[test]
    fn test_filter_key_distinguishes_fields() {
        let by_min = ProductFilter {
            min_price: Some(Decimal::new(5, 0)),
            ..ProductFilter::default()
        };
        let by_max = ProductFilter {
            max_price: Some(Decimal::new(5, 0)),
            ..ProductFilter::default()
        };
        assert_ne!(product_filter(&by_min), product_filter(&by_max));
    }

    #[test]
    fn test_filter_key_escapes_separator() {
        let forged = ProductFilter {
            name: Some("a:3".to_string()),
            ..ProductFilter::default()
        };
        let genuine = ProductFilter {
            name: Some("a".to_string()),
            category_id: Some(CategoryId::new(3)),
            ..ProductFilter::default()
        };
        assert_ne!(product_filter(&forged), product_filter(&genuine));
        assert!(product_filter(&forged).starts_with("filter:a\\:3:"));
    }
}
