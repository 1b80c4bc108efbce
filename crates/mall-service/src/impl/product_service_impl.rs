//! Database-backed product service.

use crate::dto::{CreateProductRequest, ProductPage, ProductResponse, UpdateProductRequest};
use crate::product_service::ProductService;
use async_trait::async_trait;
use chrono::Utc;
use mall_core::{
    require_not_blank, require_positive, CategoryId, MallError, MallResult, Product, ProductFilter,
    ProductId, ValidateExt,
};
use mall_repository::{CategoryRepository, ProductRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Product service over the catalog repositories.
#[derive(Component)]
#[shaku(interface = ProductService)]
pub struct ProductServiceImpl {
    #[shaku(inject)]
    product_repository: Arc<dyn ProductRepository>,
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
}

impl ProductServiceImpl {
    /// Creates a new product service.
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        category_repository: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            product_repository,
            category_repository,
        }
    }

    async fn require_category(&self, category_id: CategoryId) -> MallResult<()> {
        if self.category_repository.exists(category_id).await? {
            Ok(())
        } else {
            Err(MallError::validation(format!(
                "category_id: category {} does not exist",
                category_id
            )))
        }
    }
}

fn to_responses(products: Vec<Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

#[async_trait]
impl ProductService for ProductServiceImpl {
    async fn get_all_products(&self) -> MallResult<Vec<ProductResponse>> {
        debug!("Listing products");
        Ok(to_responses(self.product_repository.find_all().await?))
    }

    async fn get_product_by_id(&self, id: ProductId) -> MallResult<ProductResponse> {
        debug!("Getting product: {}", id);

        self.product_repository
            .find_by_id(id)
            .await?
            .map(ProductResponse::from)
            .ok_or_else(|| MallError::not_found("Product", id))
    }

    async fn get_products_by_category(
        &self,
        category_id: CategoryId,
    ) -> MallResult<Vec<ProductResponse>> {
        debug!("Listing products in category: {}", category_id);
        Ok(to_responses(
            self.product_repository.find_by_category(category_id).await?,
        ))
    }

    async fn search_products(&self, term: &str) -> MallResult<Vec<ProductResponse>> {
        let term = term.trim();
        if term.is_empty() {
            return Err(MallError::validation("term: search term must not be blank"));
        }

        debug!("Searching products: {}", term);
        Ok(to_responses(self.product_repository.search(term).await?))
    }

    async fn filter_products(&self, filter: ProductFilter) -> MallResult<ProductPage> {
        debug!("Filtering products: {:?}", filter);

        let (products, total) = self.product_repository.filter(&filter).await?;
        Ok(ProductPage::new(products, total))
    }

    async fn create_product(&self, request: CreateProductRequest) -> MallResult<ProductResponse> {
        debug!("Creating product: {}", request.name);

        request.validate_request()?;
        require_not_blank("name", &request.name)?;
        require_positive("price", request.price)?;
        self.require_category(request.category_id).await?;

        let product = Product::new(
            request.name,
            request.description,
            request.price,
            request.stock_quantity,
            request.sku,
            request.image_url,
            request.category_id,
        );
        let saved = self.product_repository.save(&product).await?;

        info!("Product created: {}", saved.id);
        Ok(saved.into())
    }

    async fn update_product(
        &self,
        id: ProductId,
        request: UpdateProductRequest,
    ) -> MallResult<ProductResponse> {
        debug!("Updating product: {}", id);

        request.validate_request()?;
        require_not_blank("name", &request.name)?;
        require_positive("price", request.price)?;

        let mut product = self
            .product_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| MallError::not_found("Product", id))?;

        self.require_category(request.category_id).await?;

        product.name = request.name;
        product.description = request.description;
        product.price = request.price;
        product.stock_quantity = request.stock_quantity;
        product.sku = request.sku;
        product.image_url = request.image_url;
        product.is_active = request.is_active;
        product.category_id = request.category_id;
        product.updated_at = Some(Utc::now());

        let updated = self.product_repository.update(&product).await?;

        info!("Product updated: {}", id);
        Ok(updated.into())
    }

    async fn delete_product(&self, id: ProductId) -> MallResult<()> {
        debug!("Deleting product: {}", id);

        if !self.product_repository.delete(id).await? {
            return Err(MallError::not_found("Product", id));
        }

        info!("Product deleted: {}", id);
        Ok(())
    }

    async fn product_exists(&self, id: ProductId) -> MallResult<bool> {
        self.product_repository.exists(id).await
    }
}

impl std::fmt::Debug for ProductServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductServiceImpl").finish_non_exhaustive()
    }
}
