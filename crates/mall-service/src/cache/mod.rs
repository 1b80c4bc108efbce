//! Caching infrastructure for the service layer.
//!
//! A bounded in-process store plus cache-aside decorators that wrap the
//! catalog services without changing their interface.

mod cache_aside;
pub mod cache_keys;
pub mod cache_policy;
mod cache_store;
mod cached_category_service;
mod cached_product_service;
mod memory_store;

pub use cache_aside::CacheAside;
pub use cache_policy::{CachePolicy, CachePriority};
pub use cache_store::{CacheExt, CacheStats, CacheStore};
pub use cached_category_service::CachedCategoryService;
pub use cached_product_service::CachedProductService;
pub use memory_store::MemoryCacheStore;
