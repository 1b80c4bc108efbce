//! In-memory category repository.

use crate::traits::CategoryRepository;
use async_trait::async_trait;
use mall_core::{Category, CategoryId, MallError, MallResult};
use parking_lot::RwLock;
use shaku::Component;
use std::collections::BTreeMap;

#[derive(Default)]
struct State {
    rows: BTreeMap<CategoryId, Category>,
    last_id: i32,
}

/// Category repository backed by a map, for development and tests.
///
/// Name comparisons are case-insensitive, matching the MySQL collation.
#[derive(Component, Default)]
#[shaku(interface = CategoryRepository)]
pub struct InMemoryCategoryRepository {
    #[shaku(force_default)]
    state: RwLock<State>,
}

impl InMemoryCategoryRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository holding the given categories.
    ///
    /// Categories without an assigned id get the next free one.
    #[must_use]
    pub fn with_categories(categories: Vec<Category>) -> Self {
        let repo = Self::new();
        {
            let mut state = repo.state.write();
            for mut category in categories {
                if !category.id.is_assigned() {
                    state.last_id += 1;
                    category.id = CategoryId::new(state.last_id);
                }
                state.last_id = state.last_id.max(category.id.into_inner());
                state.rows.insert(category.id, category);
            }
        }
        repo
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_all(&self) -> MallResult<Vec<Category>> {
        let mut categories: Vec<Category> = self.state.read().rows.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, id: CategoryId) -> MallResult<Option<Category>> {
        Ok(self.state.read().rows.get(&id).cloned())
    }

    async fn save(&self, category: &Category) -> MallResult<Category> {
        let mut state = self.state.write();
        if state
            .rows
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(&category.name))
        {
            return Err(MallError::conflict(format!(
                "Category name already exists: {}",
                category.name
            )));
        }
        state.last_id += 1;
        let mut saved = category.clone();
        saved.id = CategoryId::new(state.last_id);
        state.rows.insert(saved.id, saved.clone());
        Ok(saved)
    }

    async fn update(&self, category: &Category) -> MallResult<Category> {
        let mut state = self.state.write();
        match state.rows.get_mut(&category.id) {
            Some(row) => {
                *row = category.clone();
                Ok(category.clone())
            }
            None => Err(MallError::not_found("Category", category.id)),
        }
    }

    async fn delete(&self, id: CategoryId) -> MallResult<bool> {
        Ok(self.state.write().rows.remove(&id).is_some())
    }

    async fn exists(&self, id: CategoryId) -> MallResult<bool> {
        Ok(self.state.read().rows.contains_key(&id))
    }

    async fn exists_by_name(&self, name: &str) -> MallResult<bool> {
        Ok(self
            .state
            .read()
            .rows
            .values()
            .any(|c| c.name.eq_ignore_ascii_case(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(name: &str) -> Category {
        Category::new(name.to_string(), None, None)
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let repo = InMemoryCategoryRepository::new();
        let first = repo.save(&category("Books")).await.unwrap();
        let second = repo.save(&category("Toys")).await.unwrap();

        assert_eq!(first.id, CategoryId::new(1));
        assert_eq!(second.id, CategoryId::new(2));
        assert!(repo.exists(second.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_save_rejects_duplicate_name() {
        let repo = InMemoryCategoryRepository::with_categories(vec![category("Books")]);
        let err = repo.save(&category("BOOKS")).await.unwrap_err();
        assert!(matches!(err, MallError::Conflict(_)));
        assert!(repo.exists_by_name("books").await.unwrap());
    }

    #[tokio::test]
    async fn test_find_all_sorted_by_name() {
        let repo = InMemoryCategoryRepository::with_categories(vec![
            category("Toys"),
            category("Books"),
            category("Garden"),
        ]);
        let names: Vec<_> = repo
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Books", "Garden", "Toys"]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = InMemoryCategoryRepository::new();
        let mut ghost = category("Ghost");
        ghost.id = CategoryId::new(9);
        assert!(repo.update(&ghost).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_delete() {
        let repo = InMemoryCategoryRepository::with_categories(vec![category("Books")]);
        assert!(repo.delete(CategoryId::new(1)).await.unwrap());
        assert!(!repo.delete(CategoryId::new(1)).await.unwrap());
        assert!(repo.find_by_id(CategoryId::new(1)).await.unwrap().is_none());
    }
}
