//! Bounded in-process cache store.

use super::{CachePolicy, CachePriority, CacheStats, CacheStore};
use mall_config::CacheConfig;
use mall_core::{MallError, MallResult};
use parking_lot::Mutex;
use shaku::{Component, Module, ModuleBuildContext};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
    sliding: Option<Duration>,
    last_accessed: Instant,
    priority: CachePriority,
    weight: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        if now >= self.expires_at {
            return true;
        }
        self.sliding
            .is_some_and(|window| now.duration_since(self.last_accessed) >= window)
    }
}

#[derive(Default)]
struct StoreState {
    entries: HashMap<String, CacheEntry>,
    total_weight: u64,
    stats: CacheStats,
}

impl StoreState {
    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry> {
        let entry = self.entries.remove(key)?;
        self.total_weight -= entry.weight;
        Some(entry)
    }
}

/// Cache store backed by a weighted, priority-aware map.
///
/// The total weight of resident entries never exceeds `size_limit`. When an
/// insert would cross it, a compaction pass first drops expired entries, then
/// evicts live ones in order of priority (low first) and last access (oldest
/// first) until at least `compaction_percentage` of the current weight, and
/// enough room for the new entry, has been freed.
pub struct MemoryCacheStore {
    state: Option<Mutex<StoreState>>,
    size_limit: u64,
    compaction_percentage: f64,
}

impl MemoryCacheStore {
    /// Creates a store with the given limits.
    #[must_use]
    pub fn new(size_limit: u64, compaction_percentage: f64) -> Self {
        Self {
            state: Some(Mutex::new(StoreState::default())),
            size_limit,
            compaction_percentage: compaction_percentage.clamp(f64::MIN_POSITIVE, 1.0),
        }
    }

    /// Creates a store from configuration, disabled if the config says so.
    #[must_use]
    pub fn from_config(config: &CacheConfig) -> Self {
        if config.enabled {
            Self::new(config.size_limit, config.compaction_percentage)
        } else {
            Self::disabled()
        }
    }

    /// Create a no-op store. Every lookup misses and nothing is retained.
    #[must_use]
    pub fn disabled() -> Self {
        let defaults = CacheConfig::default();
        Self {
            state: None,
            size_limit: defaults.size_limit,
            compaction_percentage: defaults.compaction_percentage,
        }
    }

    fn compact(&self, state: &mut StoreState, now: Instant, incoming: u64) {
        let current = state.total_weight;
        let needed = (current + incoming).saturating_sub(self.size_limit);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let share = (current as f64 * self.compaction_percentage).ceil() as u64;
        let target = share.max(needed);

        let mut freed = 0;
        let expired: Vec<String> = state
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            if let Some(entry) = state.remove_entry(&key) {
                freed += entry.weight;
                state.stats.expirations += 1;
            }
        }

        if freed < target {
            let mut candidates: Vec<(CachePriority, Instant, String)> = state
                .entries
                .iter()
                .map(|(key, entry)| (entry.priority, entry.last_accessed, key.clone()))
                .collect();
            candidates.sort();

            for (_, _, key) in candidates {
                if freed >= target {
                    break;
                }
                if let Some(entry) = state.remove_entry(&key) {
                    debug!("Evicting cache key '{}' ({:?})", key, entry.priority);
                    freed += entry.weight;
                    state.stats.evictions += 1;
                }
            }
        }

        state.stats.compactions += 1;
        info!(
            freed,
            target,
            remaining = state.total_weight,
            entries = state.entries.len(),
            "Cache compaction completed"
        );
    }
}

/// Module component built from the `[cache]` settings.
impl<M: Module> Component<M> for MemoryCacheStore {
    type Interface = dyn CacheStore;
    type Parameters = CacheConfig;

    fn build(_: &mut ModuleBuildContext<M>, config: CacheConfig) -> Box<dyn CacheStore> {
        Box::new(Self::from_config(&config))
    }
}

impl CacheStore for MemoryCacheStore {
    fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    fn stats(&self) -> CacheStats {
        match &self.state {
            Some(state) => {
                let state = state.lock();
                CacheStats {
                    entry_count: state.entries.len(),
                    total_weight: state.total_weight,
                    ..state.stats
                }
            }
            None => CacheStats::default(),
        }
    }

    fn get_raw(&self, key: &str) -> MallResult<Option<String>> {
        let Some(state) = &self.state else {
            return Ok(None);
        };
        let now = Instant::now();
        let mut state = state.lock();

        let expired = match state.entries.get(key) {
            Some(entry) => entry.is_expired(now),
            None => {
                state.stats.misses += 1;
                return Ok(None);
            }
        };

        if expired {
            state.remove_entry(key);
            state.stats.expirations += 1;
            state.stats.misses += 1;
            debug!("Cache entry expired for key '{}'", key);
            return Ok(None);
        }

        let value = match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_accessed = now;
                entry.value.clone()
            }
            None => return Ok(None),
        };
        state.stats.hits += 1;
        Ok(Some(value))
    }

    fn set_raw(&self, key: &str, value: String, policy: &CachePolicy) -> MallResult<()> {
        let Some(state) = &self.state else {
            return Ok(());
        };
        if policy.weight > self.size_limit {
            return Err(MallError::cache(format!(
                "Entry '{}' weight {} exceeds cache size limit {}",
                key, policy.weight, self.size_limit
            )));
        }

        let now = Instant::now();
        let mut state = state.lock();
        state.remove_entry(key);

        if state.total_weight + policy.weight > self.size_limit {
            self.compact(&mut state, now, policy.weight);
        }

        state.entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + policy.absolute_ttl,
                sliding: policy.sliding,
                last_accessed: now,
                priority: policy.priority,
                weight: policy.weight,
            },
        );
        state.total_weight += policy.weight;
        debug!("Cached key '{}' with weight {}", key, policy.weight);
        Ok(())
    }

    fn remove(&self, key: &str) -> MallResult<bool> {
        let Some(state) = &self.state else {
            return Ok(false);
        };
        let now = Instant::now();
        let removed = state.lock().remove_entry(key);
        Ok(removed.is_some_and(|entry| !entry.is_expired(now)))
    }

    fn contains(&self, key: &str) -> MallResult<bool> {
        let Some(state) = &self.state else {
            return Ok(false);
        };
        let now = Instant::now();
        Ok(state
            .lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now)))
    }
}

impl std::fmt::Debug for MemoryCacheStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCacheStore")
            .field("enabled", &self.is_enabled())
            .field("size_limit", &self.size_limit)
            .field("compaction_percentage", &self.compaction_percentage)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(ttl_mins: u64, priority: CachePriority, weight: u64) -> CachePolicy {
        CachePolicy::new(Duration::from_secs(ttl_mins * 60), priority, weight)
    }

    fn mins(n: u64) -> Duration {
        Duration::from_secs(n * 60)
    }

    #[test]
    fn test_disabled_store() {
        let store = MemoryCacheStore::disabled();
        assert!(!store.is_enabled());
        store
            .set_raw("k", "1".to_string(), &policy(5, CachePriority::Low, 1))
            .unwrap();
        assert_eq!(store.get_raw("k").unwrap(), None);
        assert!(!store.remove("k").unwrap());
    }

    #[test]
    fn test_from_config_respects_enabled_flag() {
        let mut config = CacheConfig::default();
        assert!(MemoryCacheStore::from_config(&config).is_enabled());
        config.enabled = false;
        assert!(!MemoryCacheStore::from_config(&config).is_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_set_remove() {
        let store = MemoryCacheStore::new(10, 0.25);
        store
            .set_raw("a", "\"x\"".to_string(), &policy(5, CachePriority::Normal, 2))
            .unwrap();

        assert_eq!(store.get_raw("a").unwrap().as_deref(), Some("\"x\""));
        assert!(store.contains("a").unwrap());
        assert!(store.remove("a").unwrap());
        assert!(!store.remove("a").unwrap());
        assert_eq!(store.get_raw("a").unwrap(), None);

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.total_weight, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_key_does_not_double_count_weight() {
        let store = MemoryCacheStore::new(10, 0.25);
        let p = policy(5, CachePriority::Normal, 4);
        store.set_raw("a", "1".to_string(), &p).unwrap();
        store.set_raw("a", "2".to_string(), &p).unwrap();

        assert_eq!(store.stats().total_weight, 4);
        assert_eq!(store.get_raw("a").unwrap().as_deref(), Some("2"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_absolute_expiry_ignores_access() {
        let store = MemoryCacheStore::new(10, 0.25);
        let p = policy(120, CachePriority::High, 1).with_sliding(mins(30));
        store.set_raw("categories:all", "[]".to_string(), &p).unwrap();

        for _ in 0..5 {
            tokio::time::advance(mins(20)).await;
            assert!(store.get_raw("categories:all").unwrap().is_some());
        }
        tokio::time::advance(mins(20)).await;
        assert_eq!(store.get_raw("categories:all").unwrap(), None);
        assert_eq!(store.stats().expirations, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sliding_window_expires_idle_entry() {
        let store = MemoryCacheStore::new(10, 0.25);
        let p = policy(30, CachePriority::Normal, 1).with_sliding(mins(10));
        store.set_raw("product:5", "{}".to_string(), &p).unwrap();

        tokio::time::advance(mins(9)).await;
        assert!(store.get_raw("product:5").unwrap().is_some());
        tokio::time::advance(mins(9)).await;
        assert!(store.contains("product:5").unwrap());
        tokio::time::advance(mins(1)).await;
        assert!(!store.contains("product:5").unwrap());
        assert_eq!(store.get_raw("product:5").unwrap(), None);
    }

    #[test]
    fn test_oversized_entry_is_rejected() {
        let store = MemoryCacheStore::new(3, 0.25);
        let err = store
            .set_raw("big", "x".to_string(), &policy(5, CachePriority::High, 4))
            .unwrap_err();
        assert!(matches!(err, MallError::Cache(_)));
        assert_eq!(store.stats().entry_count, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compaction_evicts_by_priority_then_recency() {
        let store = MemoryCacheStore::new(6, 0.1);
        store.set_raw("high", "h".to_string(), &policy(60, CachePriority::High, 2)).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.set_raw("normal", "n".to_string(), &policy(60, CachePriority::Normal, 1)).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.set_raw("low-old", "l".to_string(), &policy(60, CachePriority::Low, 1)).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        store.set_raw("low-new", "l".to_string(), &policy(60, CachePriority::Low, 1)).unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
        // low-old becomes the most recently used low entry
        assert!(store.get_raw("low-old").unwrap().is_some());
        assert_eq!(store.stats().total_weight, 5);

        // 5 + 2 > 6, target = max(ceil(5 * 0.1), 1) = 1
        store.set_raw("incoming", "i".to_string(), &policy(60, CachePriority::Normal, 2)).unwrap();

        assert!(!store.contains("low-new").unwrap());
        assert!(store.contains("low-old").unwrap());
        assert!(store.contains("normal").unwrap());
        assert!(store.contains("high").unwrap());
        assert!(store.contains("incoming").unwrap());

        let stats = store.stats();
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.compactions, 1);
        assert_eq!(stats.total_weight, 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compaction_frees_configured_share() {
        let store = MemoryCacheStore::new(8, 0.5);
        for (i, priority) in [CachePriority::High, CachePriority::Normal, CachePriority::Low, CachePriority::Low]
            .into_iter()
            .enumerate()
        {
            store.set_raw(&format!("k{}", i), "v".to_string(), &policy(60, priority, 2)).unwrap();
            tokio::time::advance(Duration::from_secs(1)).await;
        }

        // 8 + 1 > 8, target = max(ceil(8 * 0.5), 1) = 4
        store.set_raw("k4", "v".to_string(), &policy(60, CachePriority::High, 1)).unwrap();

        assert!(!store.contains("k2").unwrap());
        assert!(!store.contains("k3").unwrap());
        assert!(store.contains("k1").unwrap());
        assert_eq!(store.stats().total_weight, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_compaction_purges_expired_first() {
        let store = MemoryCacheStore::new(4, 0.25);
        store.set_raw("stale", "s".to_string(), &policy(1, CachePriority::High, 2)).unwrap();
        store.set_raw("fresh", "f".to_string(), &policy(60, CachePriority::Low, 2)).unwrap();
        tokio::time::advance(mins(2)).await;

        store.set_raw("next", "n".to_string(), &policy(60, CachePriority::Low, 1)).unwrap();

        assert!(store.contains("fresh").unwrap());
        assert!(store.contains("next").unwrap());
        let stats = store.stats();
        assert_eq!(stats.expirations, 1);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_weight, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_weight_never_exceeds_limit() {
        let store = MemoryCacheStore::new(20, 0.25);
        let priorities = [CachePriority::Low, CachePriority::Normal, CachePriority::High];
        for i in 0..200u64 {
            let p = policy(60, priorities[(i % 3) as usize], 1 + i % 5);
            store.set_raw(&format!("key:{}", i), i.to_string(), &p).unwrap();
            assert!(store.stats().total_weight <= 20);
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        assert!(store.stats().compactions > 0);
    }
}
