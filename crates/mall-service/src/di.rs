//! Dependency injection modules using Shaku.
//!
//! - `CatalogModule`: MySQL repositories behind the backing services
//! - `InMemoryCatalogModule`: map-backed repositories for development and tests
//!
//! A module binds one component per interface, so the caching decorators are
//! not registered here. [`Catalog::from_module`](crate::Catalog::from_module)
//! wraps the resolved services instead.

use crate::cache::{CacheStore, MemoryCacheStore};
use crate::r#impl::{CategoryServiceImpl, ProductServiceImpl};
use crate::{CategoryService, ProductService};
use mall_config::{AppConfig, CacheConfig};
use mall_core::{module, HasComponent, MallResult};
use mall_repository::{
    create_pool, DatabasePool, DatabasePoolInterface, DatabasePoolParameters,
    InMemoryCategoryRepository, InMemoryProductRepository, MySqlCategoryRepository,
    MySqlProductRepository,
};
use std::sync::Arc;

module! {
    pub CatalogModule {
        components = [
            DatabasePool,
            MySqlCategoryRepository,
            MySqlProductRepository,
            MemoryCacheStore,
            CategoryServiceImpl,
            ProductServiceImpl,
        ],
        providers = [],
    }
}

module! {
    pub InMemoryCatalogModule {
        components = [
            InMemoryCategoryRepository,
            InMemoryProductRepository,
            MemoryCacheStore,
            CategoryServiceImpl,
            ProductServiceImpl,
        ],
        providers = [],
    }
}

/// Connects to MySQL and builds the catalog module.
pub async fn build_catalog_module(config: &AppConfig) -> MallResult<Arc<CatalogModule>> {
    let db_pool = create_pool(&config.database).await?;

    let module = CatalogModule::builder()
        .with_component_parameters::<DatabasePool>(DatabasePoolParameters {
            pool: db_pool.inner().clone(),
        })
        .with_component_parameters::<MemoryCacheStore>(config.cache.clone())
        .build();

    Ok(Arc::new(module))
}

/// Builds a module over empty in-memory repositories.
#[must_use]
pub fn build_in_memory_module(cache_config: &CacheConfig) -> Arc<InMemoryCatalogModule> {
    let module = InMemoryCatalogModule::builder()
        .with_component_parameters::<MemoryCacheStore>(cache_config.clone())
        .build();
    Arc::new(module)
}

/// Resolves the backing services and the shared store from a module.
pub trait CatalogResolver {
    fn category_service(&self) -> Arc<dyn CategoryService>;

    fn product_service(&self) -> Arc<dyn ProductService>;

    fn cache_store(&self) -> Arc<dyn CacheStore>;
}

impl CatalogResolver for CatalogModule {
    fn category_service(&self) -> Arc<dyn CategoryService> {
        self.resolve()
    }

    fn product_service(&self) -> Arc<dyn ProductService> {
        self.resolve()
    }

    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}

impl CatalogResolver for InMemoryCatalogModule {
    fn category_service(&self) -> Arc<dyn CategoryService> {
        self.resolve()
    }

    fn product_service(&self) -> Arc<dyn ProductService> {
        self.resolve()
    }

    fn cache_store(&self) -> Arc<dyn CacheStore> {
        self.resolve()
    }
}

/// Resolves the database pool from modules that have one.
pub trait DatabaseResolver {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface>;
}

impl DatabaseResolver for CatalogModule {
    fn database_pool(&self) -> Arc<dyn DatabasePoolInterface> {
        self.resolve()
    }
}
