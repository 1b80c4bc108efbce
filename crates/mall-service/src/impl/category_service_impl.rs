//! Database-backed category service.

use crate::category_service::CategoryService;
use crate::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};
use async_trait::async_trait;
use mall_core::{require_not_blank, Category, CategoryId, MallError, MallResult, ValidateExt};
use mall_repository::{CategoryRepository, ProductRepository};
use shaku::Component;
use std::sync::Arc;
use tracing::{debug, info};

/// Category service over the catalog repositories.
#[derive(Component)]
#[shaku(interface = CategoryService)]
pub struct CategoryServiceImpl {
    #[shaku(inject)]
    category_repository: Arc<dyn CategoryRepository>,
    #[shaku(inject)]
    product_repository: Arc<dyn ProductRepository>,
}

impl CategoryServiceImpl {
    /// Creates a new category service.
    pub fn new(
        category_repository: Arc<dyn CategoryRepository>,
        product_repository: Arc<dyn ProductRepository>,
    ) -> Self {
        Self {
            category_repository,
            product_repository,
        }
    }

    async fn to_response(&self, category: Category) -> MallResult<CategoryResponse> {
        let count = self
            .product_repository
            .count_active_in_category(category.id)
            .await?;
        Ok(CategoryResponse::with_count(category, count))
    }
}

#[async_trait]
impl CategoryService for CategoryServiceImpl {
    async fn get_all_categories(&self) -> MallResult<Vec<CategoryResponse>> {
        debug!("Listing categories");

        let categories = self.category_repository.find_all().await?;
        let mut responses = Vec::with_capacity(categories.len());
        for category in categories {
            responses.push(self.to_response(category).await?);
        }
        Ok(responses)
    }

    async fn get_category_by_id(&self, id: CategoryId) -> MallResult<CategoryResponse> {
        debug!("Getting category: {}", id);

        let category = self
            .category_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| MallError::not_found("Category", id))?;

        self.to_response(category).await
    }

    async fn create_category(&self, request: CreateCategoryRequest) -> MallResult<CategoryResponse> {
        debug!("Creating category: {}", request.name);

        request.validate_request()?;
        require_not_blank("name", &request.name)?;

        if self.category_repository.exists_by_name(&request.name).await? {
            return Err(MallError::Conflict(format!(
                "Category '{}' already exists",
                request.name
            )));
        }

        let category = Category::new(request.name, request.description, request.image_url);
        let saved = self.category_repository.save(&category).await?;

        info!("Category created: {}", saved.id);
        Ok(CategoryResponse::with_count(saved, 0))
    }

    async fn update_category(
        &self,
        id: CategoryId,
        request: UpdateCategoryRequest,
    ) -> MallResult<CategoryResponse> {
        debug!("Updating category: {}", id);

        request.validate_request()?;
        require_not_blank("name", &request.name)?;

        let mut category = self
            .category_repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| MallError::not_found("Category", id))?;

        let renamed = !category.name.eq_ignore_ascii_case(&request.name);
        if renamed && self.category_repository.exists_by_name(&request.name).await? {
            return Err(MallError::Conflict(format!(
                "Category '{}' already exists",
                request.name
            )));
        }

        category.apply_update(
            request.name,
            request.description,
            request.image_url,
            request.is_active,
        );
        let updated = self.category_repository.update(&category).await?;

        info!("Category updated: {}", id);
        self.to_response(updated).await
    }

    async fn delete_category(&self, id: CategoryId) -> MallResult<()> {
        debug!("Deleting category: {}", id);

        if !self.category_repository.exists(id).await? {
            return Err(MallError::not_found("Category", id));
        }

        if self.product_repository.has_products_in_category(id).await? {
            return Err(MallError::business_rule(format!(
                "Category {} still has products",
                id
            )));
        }

        if !self.category_repository.delete(id).await? {
            return Err(MallError::not_found("Category", id));
        }

        info!("Category deleted: {}", id);
        Ok(())
    }

    async fn category_exists(&self, id: CategoryId) -> MallResult<bool> {
        self.category_repository.exists(id).await
    }
}

impl std::fmt::Debug for CategoryServiceImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CategoryServiceImpl").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mall_core::Product;
    use mall_repository::{InMemoryCategoryRepository, InMemoryProductRepository};
    use rust_decimal::Decimal;

    fn service() -> CategoryServiceImpl {
        let categories = Arc::new(InMemoryCategoryRepository::with_categories(vec![
            Category::new("Electronics".to_string(), None, None),
            Category::new("Books".to_string(), None, None),
        ]));
        let mut retired = Product::new(
            "Pager".to_string(),
            None,
            Decimal::new(15, 0),
            0,
            None,
            None,
            CategoryId::new(1),
        );
        retired.is_active = false;
        let phone = Product::new(
            "Phone".to_string(),
            None,
            Decimal::new(699, 0),
            5,
            None,
            None,
            CategoryId::new(1),
        );
        let products = Arc::new(InMemoryProductRepository::with_products(
            categories.clone(),
            vec![phone, retired],
        ));
        CategoryServiceImpl::new(categories, products)
    }

    fn create(name: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: name.to_string(),
            description: None,
            image_url: None,
        }
    }

    #[tokio::test]
    async fn test_list_counts_active_products() {
        let service = service();
        let categories = service.get_all_categories().await.unwrap();

        let electronics = categories.iter().find(|c| c.name == "Electronics").unwrap();
        assert_eq!(electronics.product_count, 1);
        let books = categories.iter().find(|c| c.name == "Books").unwrap();
        assert_eq!(books.product_count, 0);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let err = service()
            .get_category_by_id(CategoryId::new(42))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_create_rejects_duplicates_and_blank_names() {
        let service = service();

        let created = service.create_category(create("Garden")).await.unwrap();
        assert_eq!(created.id, CategoryId::new(3));
        assert_eq!(created.product_count, 0);

        let dup = service.create_category(create("books")).await.unwrap_err();
        assert!(matches!(dup, MallError::Conflict(_)));

        let blank = service.create_category(create("   ")).await.unwrap_err();
        assert!(matches!(blank, MallError::Validation(_)));

        let long = service.create_category(create(&"x".repeat(101))).await.unwrap_err();
        assert!(matches!(long, MallError::Validation(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_own_name_and_stamps_time() {
        let service = service();
        let updated = service
            .update_category(
                CategoryId::new(2),
                UpdateCategoryRequest {
                    name: "BOOKS".to_string(),
                    description: Some("Paper".to_string()),
                    image_url: None,
                    is_active: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "BOOKS");
        assert!(!updated.is_active);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = service()
            .update_category(
                CategoryId::new(9),
                UpdateCategoryRequest {
                    name: "Nine".to_string(),
                    description: None,
                    image_url: None,
                    is_active: true,
                },
            )
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let service = service();

        let in_use = service.delete_category(CategoryId::new(1)).await.unwrap_err();
        assert!(matches!(in_use, MallError::BusinessRule(_)));

        service.delete_category(CategoryId::new(2)).await.unwrap();
        assert!(!service.category_exists(CategoryId::new(2)).await.unwrap());

        let gone = service.delete_category(CategoryId::new(2)).await.unwrap_err();
        assert!(gone.is_not_found());
    }
}
