//! In-memory repository implementations.

mod category_repository;
mod product_repository;

pub use category_repository::InMemoryCategoryRepository;
pub use product_repository::InMemoryProductRepository;
