//! Cache-aside read and invalidation helpers shared by the caching decorators.

use super::{CacheExt, CachePolicy, CacheStore};
use mall_core::MallResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

/// Cache-aside access to a [`CacheStore`].
///
/// Store failures never reach the caller: a failed lookup counts as a miss, a
/// failed write or removal is logged and dropped.
#[derive(Clone)]
pub struct CacheAside {
    store: Arc<dyn CacheStore>,
}

impl CacheAside {
    /// Wraps a shared store.
    #[must_use]
    pub fn new(store: Arc<dyn CacheStore>) -> Self {
        Self { store }
    }

    /// Returns the cached value for `key`, if any.
    pub fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get::<T>(key) {
            Ok(Some(value)) => {
                debug!("Cache hit for key '{}'", key);
                Some(value)
            }
            Ok(None) => {
                debug!("Cache miss for key '{}'", key);
                None
            }
            Err(e) => {
                warn!("Cache lookup failed for key '{}': {}", key, e);
                None
            }
        }
    }

    /// Stores `value` under `key`.
    pub fn populate<T: Serialize + ?Sized>(&self, key: &str, value: &T, policy: &CachePolicy) {
        if let Err(e) = self.store.set(key, value, policy) {
            warn!("Failed to cache key '{}': {}", key, e);
        }
    }

    /// Removes `key`. Removing an absent key is a no-op.
    pub fn invalidate(&self, key: &str) {
        match self.store.remove(key) {
            Ok(removed) => debug!("Invalidated key '{}': {}", key, removed),
            Err(e) => warn!("Failed to invalidate key '{}': {}", key, e),
        }
    }

    /// Returns the cached value, or loads it and caches the result.
    ///
    /// Errors from `load` are returned as-is and leave the cache untouched.
    /// Concurrent misses on the same key each call `load`.
    pub async fn get_or_populate<T, F, Fut>(
        &self,
        key: &str,
        policy: &CachePolicy,
        load: F,
    ) -> MallResult<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = MallResult<T>>,
    {
        if let Some(cached) = self.lookup(key) {
            return Ok(cached);
        }

        let value = load().await?;
        self.populate(key, &value, policy);
        Ok(value)
    }
}

impl std::fmt::Debug for CacheAside {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheAside")
            .field("enabled", &self.store.is_enabled())
            .finish()
    }
}
