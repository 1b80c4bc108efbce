//! Cache store trait for abstracted caching operations.

use super::CachePolicy;
use mall_core::{Interface, MallResult};

/// Process-wide key/value store for cached catalog reads.
///
/// Values are JSON documents so the trait stays dyn-compatible. Operations are
/// synchronous: implementations hold no I/O and never block on the network.
pub trait CacheStore: Interface + Send + Sync {
    /// Get a raw JSON value.
    ///
    /// Returns `None` if the key is absent or has expired. A hit refreshes the
    /// entry's sliding window.
    fn get_raw(&self, key: &str) -> MallResult<Option<String>>;

    /// Store a raw JSON value, replacing any entry under the same key.
    fn set_raw(&self, key: &str, value: String, policy: &CachePolicy) -> MallResult<()>;

    /// Remove a value. Returns `true` if a live entry was removed.
    fn remove(&self, key: &str) -> MallResult<bool>;

    /// Check for a live entry without touching its access time.
    fn contains(&self, key: &str) -> MallResult<bool>;

    /// Check if caching is enabled.
    fn is_enabled(&self) -> bool;

    /// Snapshot of the activity counters. Stores that keep none report zeros.
    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// Counters describing store activity since creation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Live entries removed by compaction.
    pub evictions: u64,
    /// Entries dropped because their absolute or sliding window elapsed.
    pub expirations: u64,
    pub compactions: u64,
    pub entry_count: usize,
    pub total_weight: u64,
}

/// Typed access on top of [`CacheStore`].
pub trait CacheExt: CacheStore {
    /// Get a typed value.
    fn get<T: serde::de::DeserializeOwned>(&self, key: &str) -> MallResult<Option<T>> {
        match self.get_raw(key)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value.
    fn set<T: serde::Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        policy: &CachePolicy,
    ) -> MallResult<()> {
        let json = serde_json::to_string(value)?;
        self.set_raw(key, json, policy)
    }
}

impl<T: CacheStore + ?Sized> CacheExt for T {}
