//! # Mall Service
//!
//! Catalog services for the Mall backend and the caching decorators that
//! wrap them.
//!
//! ```text
//! caller
//!   ↓  Arc<dyn CategoryService> / Arc<dyn ProductService>
//! CachedCategoryService, CachedProductService   (cache-aside over a CacheStore)
//!   ↓
//! CategoryServiceImpl, ProductServiceImpl       (validation and business rules)
//!   ↓
//! CategoryRepository, ProductRepository
//! ```

pub mod cache;
pub mod catalog;
pub mod category_service;
pub mod di;
pub mod dto;
pub mod r#impl;
pub mod product_service;

pub use cache::*;
pub use catalog::Catalog;
pub use di::{CatalogResolver, DatabaseResolver};
pub use category_service::*;
pub use dto::*;
pub use product_service::*;
pub use r#impl::*;
