//! Repository trait definitions.

use async_trait::async_trait;
use mall_core::{Category, CategoryId, Interface, MallResult, Product, ProductFilter, ProductId};

/// Category repository trait.
#[async_trait]
pub trait CategoryRepository: Interface + Send + Sync {
    /// Finds all categories ordered by name.
    async fn find_all(&self) -> MallResult<Vec<Category>>;

    /// Finds a category by ID.
    async fn find_by_id(&self, id: CategoryId) -> MallResult<Option<Category>>;

    /// Saves a new category and returns it with its assigned ID.
    async fn save(&self, category: &Category) -> MallResult<Category>;

    /// Updates an existing category.
    async fn update(&self, category: &Category) -> MallResult<Category>;

    /// Deletes a category by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: CategoryId) -> MallResult<bool>;

    /// Checks if a category exists.
    async fn exists(&self, id: CategoryId) -> MallResult<bool>;

    /// Checks if a category name is taken.
    async fn exists_by_name(&self, name: &str) -> MallResult<bool>;
}

/// Product repository trait.
///
/// Products returned by reads carry the owning category's name.
#[async_trait]
pub trait ProductRepository: Interface + Send + Sync {
    /// Finds all products ordered by name.
    async fn find_all(&self) -> MallResult<Vec<Product>>;

    /// Finds a product by ID.
    async fn find_by_id(&self, id: ProductId) -> MallResult<Option<Product>>;

    /// Finds products in a category.
    async fn find_by_category(&self, category_id: CategoryId) -> MallResult<Vec<Product>>;

    /// Case-insensitive substring search over name, description and SKU.
    async fn search(&self, term: &str) -> MallResult<Vec<Product>>;

    /// Applies a filter and returns one page plus the total match count.
    async fn filter(&self, filter: &ProductFilter) -> MallResult<(Vec<Product>, u64)>;

    /// Saves a new product and returns it with its assigned ID.
    async fn save(&self, product: &Product) -> MallResult<Product>;

    /// Updates an existing product.
    async fn update(&self, product: &Product) -> MallResult<Product>;

    /// Deletes a product by ID. Returns false if nothing was deleted.
    async fn delete(&self, id: ProductId) -> MallResult<bool>;

    /// Checks if a product exists.
    async fn exists(&self, id: ProductId) -> MallResult<bool>;

    /// Counts active products in a category.
    async fn count_active_in_category(&self, category_id: CategoryId) -> MallResult<u64>;

    /// Checks if any product, active or not, references the category.
    async fn has_products_in_category(&self, category_id: CategoryId) -> MallResult<bool>;
}
