//! Product service trait definition.

use crate::dto::{CreateProductRequest, ProductPage, ProductResponse, UpdateProductRequest};
use async_trait::async_trait;
use mall_core::{CategoryId, Interface, MallResult, ProductFilter, ProductId};

/// Product service trait.
#[async_trait]
pub trait ProductService: Interface + Send + Sync {
    /// Lists all products.
    async fn get_all_products(&self) -> MallResult<Vec<ProductResponse>>;

    /// Gets a product by ID.
    async fn get_product_by_id(&self, id: ProductId) -> MallResult<ProductResponse>;

    /// Lists the products of one category.
    async fn get_products_by_category(&self, category_id: CategoryId) -> MallResult<Vec<ProductResponse>>;

    /// Searches products by name, description or SKU.
    async fn search_products(&self, term: &str) -> MallResult<Vec<ProductResponse>>;

    /// Filters, sorts and pages products.
    async fn filter_products(&self, filter: ProductFilter) -> MallResult<ProductPage>;

    /// Creates a new product.
    async fn create_product(&self, request: CreateProductRequest) -> MallResult<ProductResponse>;

    /// Updates a product.
    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> MallResult<ProductResponse>;

    /// Deletes a product.
    async fn delete_product(&self, id: ProductId) -> MallResult<()>;

    /// Checks if a product exists.
    async fn product_exists(&self, id: ProductId) -> MallResult<bool>;
}
