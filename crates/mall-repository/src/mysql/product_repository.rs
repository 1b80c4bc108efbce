//! MySQL product repository implementation.

use crate::{traits::ProductRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mall_core::{
    CategoryId, MallError, MallResult, Product, ProductFilter, ProductId, SortDirection, SortField,
};
use rust_decimal::Decimal;
use shaku::Component;
use sqlx::{FromRow, MySql, QueryBuilder};
use std::sync::Arc;
use tracing::debug;

/// MySQL product repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = ProductRepository)]
pub struct MySqlProductRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlProductRepository {
    /// Creates a new MySQL product repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a product joined with its category name.
#[derive(Debug, FromRow)]
struct ProductRow {
    id: i32,
    name: String,
    description: Option<String>,
    price: Decimal,
    stock_quantity: i32,
    sku: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    category_id: i32,
    category_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            name: row.name,
            description: row.description,
            price: row.price,
            stock_quantity: row.stock_quantity,
            sku: row.sku,
            image_url: row.image_url,
            is_active: row.is_active,
            category_id: CategoryId::new(row.category_id),
            category_name: row.category_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_PRODUCT: &str = r#"
    SELECT p.id, p.name, p.description, p.price, p.stock_quantity, p.sku, p.image_url,
           p.is_active, p.category_id, c.name AS category_name, p.created_at, p.updated_at
    FROM products p
    LEFT JOIN categories c ON c.id = p.category_id
"#;

/// Lowercases a term and escapes LIKE wildcards.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn push_filter_conditions(builder: &mut QueryBuilder<'_, MySql>, filter: &ProductFilter) {
    if let Some(term) = filter.name_term() {
        let pattern = like_pattern(term);
        builder
            .push(" AND (LOWER(p.name) LIKE ")
            .push_bind(pattern.clone())
            .push(" OR LOWER(p.description) LIKE ")
            .push_bind(pattern)
            .push(")");
    }
    if let Some(category_id) = filter.category_id {
        builder
            .push(" AND p.category_id = ")
            .push_bind(category_id.into_inner());
    }
    if let Some(min_price) = filter.min_price {
        builder.push(" AND p.price >= ").push_bind(min_price);
    }
    if let Some(max_price) = filter.max_price {
        builder.push(" AND p.price <= ").push_bind(max_price);
    }
    match filter.in_stock {
        Some(true) => {
            builder.push(" AND p.stock_quantity > 0");
        }
        Some(false) => {
            builder.push(" AND p.stock_quantity = 0");
        }
        None => {}
    }
}

fn order_clause(filter: &ProductFilter) -> &'static str {
    match filter.sort() {
        (SortField::Name, SortDirection::Asc) => " ORDER BY p.name ASC, p.id ASC",
        (SortField::Name, SortDirection::Desc) => " ORDER BY p.name DESC, p.id ASC",
        (SortField::Price, SortDirection::Asc) => " ORDER BY p.price ASC, p.id ASC",
        (SortField::Price, SortDirection::Desc) => " ORDER BY p.price DESC, p.id ASC",
        (SortField::CreatedAt, SortDirection::Asc) => " ORDER BY p.created_at ASC, p.id ASC",
        (SortField::CreatedAt, SortDirection::Desc) => " ORDER BY p.created_at DESC, p.id ASC",
    }
}

#[async_trait]
impl ProductRepository for MySqlProductRepository {
    async fn find_all(&self) -> MallResult<Vec<Product>> {
        debug!("Finding all products");

        let rows = sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY p.name", SELECT_PRODUCT))
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: ProductId) -> MallResult<Option<Product>> {
        debug!("Finding product by id: {}", id);

        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE p.id = ?", SELECT_PRODUCT))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Product::from))
    }

    async fn find_by_category(&self, category_id: CategoryId) -> MallResult<Vec<Product>> {
        debug!("Finding products by category: {}", category_id);

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "{} WHERE p.category_id = ? ORDER BY p.name",
            SELECT_PRODUCT
        ))
        .bind(category_id.into_inner())
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn search(&self, term: &str) -> MallResult<Vec<Product>> {
        debug!("Searching products: {}", term);

        let pattern = like_pattern(term);
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            r#"{}
            WHERE LOWER(p.name) LIKE ? OR LOWER(p.description) LIKE ? OR LOWER(p.sku) LIKE ?
            ORDER BY p.name"#,
            SELECT_PRODUCT
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_all(self.pool.inner())
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn filter(&self, filter: &ProductFilter) -> MallResult<(Vec<Product>, u64)> {
        debug!(?filter, "Filtering products");

        let mut count = QueryBuilder::<MySql>::new("SELECT COUNT(*) FROM products p WHERE 1 = 1");
        push_filter_conditions(&mut count, filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(self.pool.inner())
            .await?;

        let mut select = QueryBuilder::<MySql>::new(SELECT_PRODUCT);
        select.push(" WHERE 1 = 1");
        push_filter_conditions(&mut select, filter);
        select.push(order_clause(filter));
        if let Some((offset, limit)) = filter.pagination() {
            select
                .push(" LIMIT ")
                .push_bind(limit as i64)
                .push(" OFFSET ")
                .push_bind(offset as i64);
        }

        let rows = select
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool.inner())
            .await?;

        let total = u64::try_from(total).unwrap_or_default();
        Ok((rows.into_iter().map(Product::from).collect(), total))
    }

    async fn save(&self, product: &Product) -> MallResult<Product> {
        debug!("Saving new product: {}", product.name);

        let result = sqlx::query(
            r#"
            INSERT INTO products (name, description, price, stock_quantity, sku, image_url,
                                  is_active, category_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(&product.sku)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.category_id.into_inner())
        .bind(product.created_at)
        .execute(self.pool.inner())
        .await?;

        let id = i32::try_from(result.last_insert_id())
            .map_err(|_| MallError::internal("Product id out of range"))?;

        self.find_by_id(ProductId::new(id))
            .await?
            .ok_or_else(|| MallError::internal("Failed to fetch inserted product"))
    }

    async fn update(&self, product: &Product) -> MallResult<Product> {
        debug!("Updating product: {}", product.id);

        sqlx::query(
            r#"
            UPDATE products
            SET name = ?, description = ?, price = ?, stock_quantity = ?, sku = ?,
                image_url = ?, is_active = ?, category_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price)
        .bind(product.stock_quantity)
        .bind(&product.sku)
        .bind(&product.image_url)
        .bind(product.is_active)
        .bind(product.category_id.into_inner())
        .bind(product.updated_at)
        .bind(product.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(product.id)
            .await?
            .ok_or_else(|| MallError::not_found("Product", product.id))
    }

    async fn delete(&self, id: ProductId) -> MallResult<bool> {
        debug!("Deleting product: {}", id);

        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: ProductId) -> MallResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM products WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn count_active_in_category(&self, category_id: CategoryId) -> MallResult<u64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_id = ? AND is_active = TRUE",
        )
        .bind(category_id.into_inner())
        .fetch_one(self.pool.inner())
        .await?;

        Ok(u64::try_from(count).unwrap_or_default())
    }

    async fn has_products_in_category(&self, category_id: CategoryId) -> MallResult<bool> {
        let result: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM products WHERE category_id = ? LIMIT 1")
                .bind(category_id.into_inner())
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Widget"), "%widget%");
        assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
    }

    #[test]
    fn test_order_clause_defaults_to_name() {
        assert_eq!(
            order_clause(&ProductFilter::default()),
            " ORDER BY p.name ASC, p.id ASC"
        );
        let filter = ProductFilter {
            sort_by: Some(SortField::Price),
            sort_direction: Some(SortDirection::Desc),
            ..ProductFilter::default()
        };
        assert_eq!(order_clause(&filter), " ORDER BY p.price DESC, p.id ASC");
    }
}
