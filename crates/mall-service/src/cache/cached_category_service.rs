//! Cache-aside decorator for [`CategoryService`].

use super::{cache_keys, cache_policy, CacheAside, CacheStore};
use crate::category_service::CategoryService;
use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use mall_core::{CategoryId, MallResult};
use std::sync::Arc;
use tracing::info;

/// Wraps a [`CategoryService`] with a read-through cache.
///
/// Reads are served from the store when possible. Writes go to the wrapped
/// service first and, on success, drop the list entry plus the entry of the
/// touched category.
pub struct CachedCategoryService {
    inner: Arc<dyn CategoryService>,
    cache: CacheAside,
}

impl CachedCategoryService {
    /// Creates a decorator over `inner` backed by `store`.
    pub fn new(inner: Arc<dyn CategoryService>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            inner,
            cache: CacheAside::new(store),
        }
    }

    fn invalidate_after_write(&self, id: Option<CategoryId>) {
        self.cache.invalidate(cache_keys::CATEGORIES_ALL);
        if let Some(id) = id {
            self.cache.invalidate(&cache_keys::category_by_id(id));
        }
    }
}

#[async_trait]
impl CategoryService for CachedCategoryService {
    async fn get_all_categories(&self) -> MallResult<Vec<CategoryResponse>> {
        self.cache
            .get_or_populate(cache_keys::CATEGORIES_ALL, &cache_policy::CATEGORY_LIST, || {
                self.inner.get_all_categories()
            })
            .await
    }

    async fn get_category_by_id(&self, id: CategoryId) -> MallResult<CategoryResponse> {
        let key = cache_keys::category_by_id(id);
        self.cache
            .get_or_populate(&key, &cache_policy::CATEGORY_ITEM, || {
                self.inner.get_category_by_id(id)
            })
            .await
    }

    async fn create_category(&self, request: CreateCategoryRequest) -> MallResult<CategoryResponse> {
        let created = self.inner.create_category(request).await?;
        self.invalidate_after_write(None);
        info!("Category {} created, list cache invalidated", created.id);
        Ok(created)
    }

    async fn update_category(
        &self,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> MallResult<CategoryResponse> {
        let updated = self.inner.update_category(id, request).await?;
        self.invalidate_after_write(Some(id));
        info!("Category {} updated, cache invalidated", id);
        Ok(updated)
    }

    async fn delete_category(&self, id: CategoryId) -> MallResult<()> {
        self.inner.delete_category(id).await?;
        self.invalidate_after_write(Some(id));
        info!("Category {} deleted, cache invalidated", id);
        Ok(())
    }

    async fn category_exists(&self, id: CategoryId) -> MallResult<bool> {
        self.inner.category_exists(id).await
    }
}

impl std::fmt::Debug for CachedCategoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedCategoryService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
