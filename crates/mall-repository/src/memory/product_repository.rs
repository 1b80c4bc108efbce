//! In-memory product repository.

use crate::traits::{CategoryRepository, ProductRepository};
use async_trait::async_trait;
use mall_core::{CategoryId, MallError, MallResult, Product, ProductFilter, ProductId};
use parking_lot::RwLock;
use shaku::Component;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

#[derive(Default)]
struct State {
    rows: BTreeMap<ProductId, Product>,
    last_id: i32,
}

/// Product repository backed by a map, for development and tests.
///
/// Reads the category repository to enforce the category reference and to
/// fill in `category_name` on reads.
#[derive(Component)]
#[shaku(interface = ProductRepository)]
pub struct InMemoryProductRepository {
    #[shaku(inject)]
    categories: Arc<dyn CategoryRepository>,
    #[shaku(force_default)]
    state: RwLock<State>,
}

impl InMemoryProductRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self {
            categories,
            state: RwLock::new(State::default()),
        }
    }

    /// Creates a repository holding the given products.
    #[must_use]
    pub fn with_products(categories: Arc<dyn CategoryRepository>, products: Vec<Product>) -> Self {
        let repo = Self::new(categories);
        {
            let mut state = repo.state.write();
            for mut product in products {
                if !product.id.is_assigned() {
                    state.last_id += 1;
                    product.id = ProductId::new(state.last_id);
                }
                state.last_id = state.last_id.max(product.id.into_inner());
                state.rows.insert(product.id, product);
            }
        }
        repo
    }

    async fn decorate(&self, mut product: Product) -> MallResult<Product> {
        product.category_name = self
            .categories
            .find_by_id(product.category_id)
            .await?
            .map(|c| c.name);
        Ok(product)
    }

    async fn decorate_all(&self, products: Vec<Product>) -> MallResult<Vec<Product>> {
        let names: HashMap<CategoryId, String> = self
            .categories
            .find_all()
            .await?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        Ok(products
            .into_iter()
            .map(|mut p| {
                p.category_name = names.get(&p.category_id).cloned();
                p
            })
            .collect())
    }

    async fn snapshot(&self, keep: impl Fn(&Product) -> bool) -> MallResult<Vec<Product>> {
        let mut products: Vec<Product> = self
            .state
            .read()
            .rows
            .values()
            .filter(|p| keep(p))
            .cloned()
            .collect();
        products.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        self.decorate_all(products).await
    }

    async fn ensure_category(&self, category_id: CategoryId) -> MallResult<()> {
        if self.categories.exists(category_id).await? {
            Ok(())
        } else {
            Err(MallError::conflict(format!(
                "Category {} does not exist",
                category_id
            )))
        }
    }
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn find_all(&self) -> MallResult<Vec<Product>> {
        self.snapshot(|_| true).await
    }

    async fn find_by_id(&self, id: ProductId) -> MallResult<Option<Product>> {
        let product = self.state.read().rows.get(&id).cloned();
        match product {
            Some(p) => Ok(Some(self.decorate(p).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_category(&self, category_id: CategoryId) -> MallResult<Vec<Product>> {
        self.snapshot(|p| p.category_id == category_id).await
    }

    async fn search(&self, term: &str) -> MallResult<Vec<Product>> {
        self.snapshot(|p| p.matches_term(term)).await
    }

    async fn filter(&self, filter: &ProductFilter) -> MallResult<(Vec<Product>, u64)> {
        let all: Vec<Product> = self.state.read().rows.values().cloned().collect();
        let (page, total) = filter.apply(all);
        Ok((self.decorate_all(page).await?, total))
    }

    async fn save(&self, product: &Product) -> MallResult<Product> {
        self.ensure_category(product.category_id).await?;
        let saved = {
            let mut state = self.state.write();
            state.last_id += 1;
            let mut saved = product.clone();
            saved.id = ProductId::new(state.last_id);
            state.rows.insert(saved.id, saved.clone());
            saved
        };
        self.decorate(saved).await
    }

    async fn update(&self, product: &Product) -> MallResult<Product> {
        self.ensure_category(product.category_id).await?;
        {
            let mut state = self.state.write();
            let row = state
                .rows
                .get_mut(&product.id)
                .ok_or_else(|| MallError::not_found("Product", product.id))?;
            *row = product.clone();
        }
        self.decorate(product.clone()).await
    }

    async fn delete(&self, id: ProductId) -> MallResult<bool> {
        Ok(self.state.write().rows.remove(&id).is_some())
    }

    async fn exists(&self, id: ProductId) -> MallResult<bool> {
        Ok(self.state.read().rows.contains_key(&id))
    }

    async fn count_active_in_category(&self, category_id: CategoryId) -> MallResult<u64> {
        let count = self
            .state
            .read()
            .rows
            .values()
            .filter(|p| p.category_id == category_id && p.is_active)
            .count();
        Ok(count as u64)
    }

    async fn has_products_in_category(&self, category_id: CategoryId) -> MallResult<bool> {
        Ok(self
            .state
            .read()
            .rows
            .values()
            .any(|p| p.category_id == category_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryCategoryRepository;
    use mall_core::{Category, SortDirection, SortField};
    use rust_decimal::Decimal;

    fn product(name: &str, price: i64, stock: i32, category: i32) -> Product {
        Product::new(
            name.to_string(),
            Some(format!("{} description", name)),
            Decimal::new(price, 0),
            stock,
            Some(format!("SKU-{}", name.to_uppercase())),
            None,
            CategoryId::new(category),
        )
    }

    fn repo() -> InMemoryProductRepository {
        let categories = Arc::new(InMemoryCategoryRepository::with_categories(vec![
            Category::new("Electronics".to_string(), None, None),
            Category::new("Books".to_string(), None, None),
        ]));
        let mut retired = product("Pager", 15, 0, 1);
        retired.is_active = false;
        InMemoryProductRepository::with_products(
            categories,
            vec![
                product("Phone", 700, 5, 1),
                product("Laptop", 1300, 0, 1),
                product("Novel", 12, 40, 2),
                retired,
            ],
        )
    }

    #[tokio::test]
    async fn test_reads_carry_category_name() {
        let repo = repo();
        let phone = repo.find_by_id(ProductId::new(1)).await.unwrap().unwrap();
        assert_eq!(phone.category_name.as_deref(), Some("Electronics"));
    }

    #[tokio::test]
    async fn test_find_by_category() {
        let repo = repo();
        let books = repo.find_by_category(CategoryId::new(2)).await.unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "Novel");
        assert!(repo.find_by_category(CategoryId::new(7)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_matches_sku_case_insensitive() {
        let repo = repo();
        let found = repo.search("sku-lap").await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Laptop");
    }

    #[tokio::test]
    async fn test_filter_pages_and_counts() {
        let repo = repo();
        let filter = ProductFilter {
            category_id: Some(CategoryId::new(1)),
            sort_by: Some(SortField::Price),
            sort_direction: Some(SortDirection::Desc),
            page: Some(1),
            page_size: Some(2),
            ..ProductFilter::default()
        };
        let (items, total) = repo.filter(&filter).await.unwrap();
        assert_eq!(total, 3);
        let names: Vec<_> = items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Laptop", "Phone"]);
        assert!(items.iter().all(|p| p.category_name.is_some()));
    }

    #[tokio::test]
    async fn test_active_count_and_presence() {
        let repo = repo();
        assert_eq!(repo.count_active_in_category(CategoryId::new(1)).await.unwrap(), 2);
        assert!(repo.has_products_in_category(CategoryId::new(2)).await.unwrap());
        assert!(!repo.has_products_in_category(CategoryId::new(3)).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_requires_known_category() {
        let repo = repo();
        let err = repo.save(&product("Orphan", 1, 1, 99)).await.unwrap_err();
        assert!(matches!(err, MallError::Conflict(_)));

        let saved = repo.save(&product("Tablet", 400, 3, 1)).await.unwrap();
        assert_eq!(saved.id, ProductId::new(5));
        assert!(repo.exists(saved.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let repo = repo();
        let mut phone = repo.find_by_id(ProductId::new(1)).await.unwrap().unwrap();
        phone.price = Decimal::new(650, 0);
        let updated = repo.update(&phone).await.unwrap();
        assert_eq!(updated.price, Decimal::new(650, 0));

        assert!(repo.delete(phone.id).await.unwrap());
        assert!(!repo.exists(phone.id).await.unwrap());
        assert!(repo.update(&phone).await.unwrap_err().is_not_found());
    }
}
