//! Bounded render caching
//!
//! Each cached delegate type owns one [`RenderCache`]. Entries are rendered
//! strings keyed by [`RenderCacheKey`]; the store never grows past its
//! configured size and gives up entries by the configured [`EvictionPolicy`].

pub mod config;
pub mod key;
pub mod stats;

pub use config::{CacheConfig, DEFAULT_CACHE_SIZE, EvictionPolicy};
pub use key::{RenderCacheKey, params_digest};
pub use stats::{CacheStatistics, CacheStatsSnapshot};

use lru::LruCache;
use parking_lot::Mutex;
use std::fmt;
use std::num::NonZeroUsize;

/// Thread-safe bounded store of rendered output
pub struct RenderCache {
    entries: Mutex<LruCache<RenderCacheKey, String>>,
    stats: CacheStatistics,
    config: CacheConfig,
}

impl RenderCache {
    /// Create a cache holding at most `config.max_size` entries
    ///
    /// A zero size is rejected when the type is built; here it is raised to one.
    pub fn new(config: CacheConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_size).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            stats: CacheStatistics::new(),
            config,
        }
    }

    /// Look up a rendered view
    ///
    /// Under FIFO a hit leaves the eviction order untouched; under LRU it
    /// marks the entry as most recently used.
    pub fn get(&self, key: &RenderCacheKey) -> Option<String> {
        let mut entries = self.entries.lock();
        let found = match self.config.eviction {
            EvictionPolicy::Fifo => entries.peek(key).cloned(),
            EvictionPolicy::Lru => entries.get(key).cloned(),
        };
        drop(entries);

        match &found {
            Some(_) => {
                self.stats.record_hit();
                log::debug!("render cache hit {key}");
            }
            None => {
                self.stats.record_miss();
                log::trace!("render cache miss {key}");
            }
        }
        found
    }

    /// Store a rendered view, evicting one entry when full
    ///
    /// An existing entry for `key` is kept as is: renders are deterministic
    /// for a key, and re-inserting would reset its FIFO position.
    pub fn put(&self, key: RenderCacheKey, rendered: String) {
        let mut entries = self.entries.lock();
        if entries.contains(&key) {
            return;
        }
        let evicted = entries.push(key, rendered);
        drop(entries);

        self.stats.record_insert();
        if let Some((evicted_key, _)) = evicted {
            self.stats.record_eviction();
            log::debug!("render cache evicted {evicted_key}");
        }
    }

    /// Check whether an entry exists without touching its order
    pub fn contains(&self, key: &RenderCacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    /// Get number of cached entries
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Drop every entry; statistics are kept
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    /// Keys in eviction order, next victim first
    pub fn keys(&self) -> Vec<RenderCacheKey> {
        self.entries.lock().iter().rev().map(|(k, _)| k.clone()).collect()
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStatistics {
        &self.stats
    }

    /// Configuration this cache was built from
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl fmt::Debug for RenderCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderCache")
            .field("len", &self.len())
            .field("config", &self.config)
            .field("stats", &self.stats.snapshot())
            .finish()
    }
}
