//! MySQL category repository implementation.

use crate::{traits::CategoryRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mall_core::{Category, CategoryId, MallError, MallResult};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

/// MySQL category repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = CategoryRepository)]
pub struct MySqlCategoryRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl MySqlCategoryRepository {
    /// Creates a new MySQL category repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a category.
#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i32,
    name: String,
    description: Option<String>,
    image_url: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: CategoryId::new(row.id),
            name: row.name,
            description: row.description,
            image_url: row.image_url,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_CATEGORY: &str = r#"
    SELECT id, name, description, image_url, is_active, created_at, updated_at
    FROM categories
"#;

#[async_trait]
impl CategoryRepository for MySqlCategoryRepository {
    async fn find_all(&self) -> MallResult<Vec<Category>> {
        debug!("Finding all categories");

        let rows = sqlx::query_as::<_, CategoryRow>(&format!("{} ORDER BY name", SELECT_CATEGORY))
            .fetch_all(self.pool.inner())
            .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn find_by_id(&self, id: CategoryId) -> MallResult<Option<Category>> {
        debug!("Finding category by id: {}", id);

        let row = sqlx::query_as::<_, CategoryRow>(&format!("{} WHERE id = ?", SELECT_CATEGORY))
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(row.map(Category::from))
    }

    async fn save(&self, category: &Category) -> MallResult<Category> {
        debug!("Saving new category: {}", category.name);

        // MySQL has no RETURNING; read the row back by its generated key
        let result = sqlx::query(
            r#"
            INSERT INTO categories (name, description, image_url, is_active, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(category.is_active)
        .bind(category.created_at)
        .execute(self.pool.inner())
        .await?;

        let id = i32::try_from(result.last_insert_id())
            .map_err(|_| MallError::internal("Category id out of range"))?;

        self.find_by_id(CategoryId::new(id))
            .await?
            .ok_or_else(|| MallError::internal("Failed to fetch inserted category"))
    }

    async fn update(&self, category: &Category) -> MallResult<Category> {
        debug!("Updating category: {}", category.id);

        sqlx::query(
            r#"
            UPDATE categories
            SET name = ?, description = ?, image_url = ?, is_active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&category.name)
        .bind(&category.description)
        .bind(&category.image_url)
        .bind(category.is_active)
        .bind(category.updated_at)
        .bind(category.id.into_inner())
        .execute(self.pool.inner())
        .await?;

        self.find_by_id(category.id)
            .await?
            .ok_or_else(|| MallError::not_found("Category", category.id))
    }

    async fn delete(&self, id: CategoryId) -> MallResult<bool> {
        debug!("Deleting category: {}", id);

        let result = sqlx::query("DELETE FROM categories WHERE id = ?")
            .bind(id.into_inner())
            .execute(self.pool.inner())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, id: CategoryId) -> MallResult<bool> {
        let result: Option<i64> = sqlx::query_scalar("SELECT 1 FROM categories WHERE id = ? LIMIT 1")
            .bind(id.into_inner())
            .fetch_optional(self.pool.inner())
            .await?;

        Ok(result.is_some())
    }

    async fn exists_by_name(&self, name: &str) -> MallResult<bool> {
        let result: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM categories WHERE name = ? LIMIT 1")
                .bind(name)
                .fetch_optional(self.pool.inner())
                .await?;

        Ok(result.is_some())
    }
}
