//! Expiration and eviction policies for catalog cache entries.

use std::time::Duration;

/// Eviction priority. Compaction removes `Low` entries first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CachePriority {
    Low,
    Normal,
    High,
}

/// How long an entry lives and how costly it is to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Hard lifetime measured from insertion. Reads never extend it.
    pub absolute_ttl: Duration,
    /// Idle window. An entry not read within it expires early.
    pub sliding: Option<Duration>,
    pub priority: CachePriority,
    /// Size units charged against the store's limit.
    pub weight: u64,
}

impl CachePolicy {
    /// Creates a policy without sliding expiration.
    #[must_use]
    pub const fn new(absolute_ttl: Duration, priority: CachePriority, weight: u64) -> Self {
        Self {
            absolute_ttl,
            sliding: None,
            priority,
            weight,
        }
    }

    /// Adds a sliding idle window.
    #[must_use]
    pub const fn with_sliding(self, sliding: Duration) -> Self {
        Self {
            sliding: Some(sliding),
            ..self
        }
    }
}

const fn minutes(n: u64) -> Duration {
    Duration::from_secs(n * 60)
}

/// `categories:all`
pub const CATEGORY_LIST: CachePolicy =
    CachePolicy::new(minutes(120), CachePriority::High, 1).with_sliding(minutes(30));

/// `category:{id}`
pub const CATEGORY_ITEM: CachePolicy =
    CachePolicy::new(minutes(120), CachePriority::High, 1).with_sliding(minutes(30));

/// `products:all`
pub const PRODUCT_LIST: CachePolicy =
    CachePolicy::new(minutes(30), CachePriority::High, 5).with_sliding(minutes(10));

/// `product:{id}`
pub const PRODUCT_ITEM: CachePolicy =
    CachePolicy::new(minutes(30), CachePriority::Normal, 1).with_sliding(minutes(10));

/// `products:category:{id}`
pub const PRODUCTS_BY_CATEGORY: CachePolicy =
    CachePolicy::new(minutes(30), CachePriority::Normal, 3).with_sliding(minutes(10));

/// `search:*` and `filter:*`
pub const PRODUCT_QUERY: CachePolicy = CachePolicy::new(minutes(15), CachePriority::Low, 2);
