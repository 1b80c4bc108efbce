//! Category service trait definition.

use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use mall_core::{CategoryId, Interface, MallResult};

/// Category service trait.
///
/// Implemented by the database-backed [`CategoryServiceImpl`](crate::CategoryServiceImpl)
/// and by the caching decorator [`CachedCategoryService`](crate::CachedCategoryService).
#[async_trait]
pub trait CategoryService: Interface + Send + Sync {
    /// Lists all categories with their active product counts.
    async fn get_all_categories(&self) -> MallResult<Vec<CategoryResponse>>;

    /// Gets a category by ID.
    async fn get_category_by_id(&self, id: CategoryId) -> MallResult<CategoryResponse>;

    /// Creates a new category.
    async fn create_category(&self, request: CreateCategoryRequest) -> MallResult<CategoryResponse>;

    /// Updates a category.
    async fn update_category(
        &self,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> MallResult<CategoryResponse>;

    /// Deletes a category that no product references.
    async fn delete_category(&self, id: CategoryId) -> MallResult<()>;

    /// Checks if a category exists.
    async fn category_exists(&self, id: CategoryId) -> MallResult<bool>;
}
