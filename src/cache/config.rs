//! Render cache configuration options

use serde::{Deserialize, Serialize};

/// Default number of rendered views kept per delegate type
pub const DEFAULT_CACHE_SIZE: usize = 50;

/// Which entry a full cache gives up to admit a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvictionPolicy {
    /// Evict the oldest inserted entry; hits do not change the order
    #[default]
    Fifo,
    /// Evict the least recently used entry; hits refresh an entry
    Lru,
}

/// Render cache settings of one delegate type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether rendered output is cached at all
    pub enabled: bool,

    /// Maximum number of entries kept
    pub max_size: usize,

    /// Eviction policy once `max_size` is reached
    pub eviction: EvictionPolicy,
}

impl CacheConfig {
    /// Create a FIFO cache configuration
    pub fn new(enabled: bool, max_size: usize) -> Self {
        Self {
            enabled,
            max_size,
            eviction: EvictionPolicy::Fifo,
        }
    }

    /// Create a configuration with caching disabled
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Create an enabled LRU configuration
    pub fn lru(max_size: usize) -> Self {
        Self {
            enabled: true,
            max_size,
            eviction: EvictionPolicy::Lru,
        }
    }

    /// Check the settings; an enabled cache must hold at least one entry
    pub fn validate(&self) -> Result<(), String> {
        if self.enabled && self.max_size == 0 {
            return Err("an enabled render cache needs max_size of at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: DEFAULT_CACHE_SIZE,
            eviction: EvictionPolicy::Fifo,
        }
    }
}
