//! # Mall Repository
//!
//! Data access for the catalog:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn CategoryRepository> / Arc<dyn ProductRepository>
//! MySqlCategoryRepository, MySqlProductRepository   (SQLx / MySQL)
//! InMemoryCategoryRepository, InMemoryProductRepository
//! ```
//!
//! Both backends apply the same filter, sort and paging rules.

pub mod memory;
pub mod mysql;
pub mod pool;
pub mod traits;

pub use memory::*;
pub use mysql::*;
pub use pool::*;
pub use traits::*;
