//! Caching decorators over the services a module resolves.

use crate::cache::{CachedCategoryService, CachedProductService, CacheStore};
use crate::di::{build_in_memory_module, CatalogResolver};
use crate::{CategoryService, ProductService};
use mall_config::CacheConfig;
use std::sync::Arc;

/// Fully wired catalog services.
///
/// Both services are the caching decorators. They share one store.
#[derive(Clone)]
pub struct Catalog {
    pub categories: Arc<dyn CategoryService>,
    pub products: Arc<dyn ProductService>,
    pub cache: Arc<dyn CacheStore>,
}

impl Catalog {
    /// Wraps the module's backing services in the caching decorators.
    pub fn from_module<M: CatalogResolver + ?Sized>(module: &M) -> Self {
        let cache = module.cache_store();

        Self {
            categories: Arc::new(CachedCategoryService::new(
                module.category_service(),
                cache.clone(),
            )),
            products: Arc::new(CachedProductService::new(
                module.product_service(),
                cache.clone(),
            )),
            cache,
        }
    }

    /// Wires the catalog over empty in-memory repositories.
    pub fn in_memory(cache_config: &CacheConfig) -> Self {
        Self::from_module(build_in_memory_module(cache_config).as_ref())
    }
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("cache_enabled", &self.cache.is_enabled())
            .finish_non_exhaustive()
    }
}
