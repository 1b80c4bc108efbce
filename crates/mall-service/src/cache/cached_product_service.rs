//! Cache-aside decorator for [`ProductService`].

use super::{cache_keys, cache_policy, CacheAside, CacheStore};
use crate::dto::{CreateProductRequest, ProductPage, ProductResponse, UpdateProductRequest};
use crate::product_service::ProductService;
use async_trait::async_trait;
use mall_core::{CategoryId, MallResult, ProductFilter, ProductId};
use std::sync::Arc;
use tracing::info;

/// Wraps a [`ProductService`] with a read-through cache.
///
/// Category listings, searches and filter pages are never invalidated by
/// writes. They age out with their TTL.
pub struct CachedProductService {
    inner: Arc<dyn ProductService>,
    cache: CacheAside,
}

impl CachedProductService {
    /// Creates a decorator over `inner` backed by `store`.
    pub fn new(inner: Arc<dyn ProductService>, store: Arc<dyn CacheStore>) -> Self {
        Self {
            inner,
            cache: CacheAside::new(store),
        }
    }

    fn invalidate_after_write(&self, id: Option<ProductId>) {
        self.cache.invalidate(cache_keys::PRODUCTS_ALL);
        if let Some(id) = id {
            self.cache.invalidate(&cache_keys::product_by_id(id));
        }
    }
}

#[async_trait]
impl ProductService for CachedProductService {
    async fn get_all_products(&self) -> MallResult<Vec<ProductResponse>> {
        self.cache
            .get_or_populate(cache_keys::PRODUCTS_ALL, &cache_policy::PRODUCT_LIST, || {
                self.inner.get_all_products()
            })
            .await
    }

    async fn get_product_by_id(&self, id: ProductId) -> MallResult<ProductResponse> {
        let key = cache_keys::product_by_id(id);
        self.cache
            .get_or_populate(&key, &cache_policy::PRODUCT_ITEM, || {
                self.inner.get_product_by_id(id)
            })
            .await
    }

    async fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> MallResult<Vec<ProductResponse>> {
        let key = cache_keys::products_by_category(category_id);
        self.cache
            .get_or_populate(&key, &cache_policy::PRODUCTS_BY_CATEGORY, || {
                self.inner.get_products_by_category(category_id)
            })
            .await
    }

    async fn search_products(&self, term: &str) -> MallResult<Vec<ProductResponse>> {
        let key = cache_keys::search(term);
        self.cache
            .get_or_populate(&key, &cache_policy::PRODUCT_QUERY, || {
                self.inner.search_products(term)
            })
            .await
    }

    async fn filter_products(&self, filter: ProductFilter) -> MallResult<ProductPage> {
        let key = cache_keys::product_filter(&filter);
        self.cache
            .get_or_populate(&key, &cache_policy::PRODUCT_QUERY, || {
                self.inner.filter_products(filter)
            })
            .await
    }

    async fn create_product(&self, request: CreateProductRequest) -> MallResult<ProductResponse> {
        let created = self.inner.create_product(request).await?;
        self.invalidate_after_write(None);
        info!("Product {} created, list cache invalidated", created.id);
        Ok(created)
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> MallResult<ProductResponse> {
        let updated = self.inner.update_product(id, request).await?;
        self.invalidate_after_write(Some(id));
        info!("Product {} updated, cache invalidated", id);
        Ok(updated)
    }

    async fn delete_product(&self, id: ProductId) -> MallResult<()> {
        self.inner.delete_product(id).await?;
        self.invalidate_after_write(Some(id));
        info!("Product {} deleted, cache invalidated", id);
        Ok(())
    }

    async fn product_exists(&self, id: ProductId) -> MallResult<bool> {
        self.inner.product_exists(id).await
    }
}

impl std::fmt::Debug for CachedProductService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedProductService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}
