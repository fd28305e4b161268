//! Registry-wide configuration

use serde::{Deserialize, Serialize};

use crate::cache::{CacheConfig, DEFAULT_CACHE_SIZE, EvictionPolicy};
use crate::core::{DelegateError, Result};

/// Configuration options for a [`DelegateRegistry`](crate::registry::DelegateRegistry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelegateConfig {
    /// Cache size used when a type turns caching on without a size
    pub default_cache_size: usize,
    /// Eviction policy of newly declared caches
    pub eviction: EvictionPolicy,
    /// Maximum number of types visited while resolving one construction
    pub max_resolution_depth: usize,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            default_cache_size: DEFAULT_CACHE_SIZE,
            eviction: EvictionPolicy::Fifo,
            max_resolution_depth: 16,
        }
    }
}

impl DelegateConfig {
    /// Parse a configuration from JSON; missing keys take their defaults
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)
            .map_err(|err| DelegateError::config(format!("invalid configuration: {err}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration values
    pub fn validate(&self) -> Result<()> {
        if self.max_resolution_depth == 0 {
            return Err(DelegateError::config(
                "max_resolution_depth must be at least 1",
            ));
        }
        self.cache_config()
            .validate()
            .map_err(DelegateError::config)
    }

    /// Cache settings handed to type builders; caching stays off until a type
    /// asks for it
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            enabled: true,
            max_size: self.default_cache_size,
            eviction: self.eviction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::VD0201;

    #[test]
    fn test_defaults() {
        let config = DelegateConfig::default();
        assert_eq!(config.default_cache_size, 50);
        assert_eq!(config.eviction, EvictionPolicy::Fifo);
        assert_eq!(config.max_resolution_depth, 16);
        assert_eq!(config.cache_config(), CacheConfig::default());
    }

    #[test]
    fn test_from_json_str_partial() {
        let config = DelegateConfig::from_json_str(r#"{"eviction": "lru"}"#).unwrap();
        assert_eq!(config.eviction, EvictionPolicy::Lru);
        assert_eq!(config.default_cache_size, 50);
    }

    #[test]
    fn test_from_json_str_rejects_bad_input() {
        let err = DelegateConfig::from_json_str("{not json").unwrap_err();
        assert_eq!(err.error_code(), &VD0201);

        let err = DelegateConfig::from_json_str(r#"{"default_cache_size": 0}"#).unwrap_err();
        assert_eq!(err.error_code(), &VD0201);

        let err = DelegateConfig::from_json_str(r#"{"max_resolution_depth": 0}"#).unwrap_err();
        assert_eq!(err.error_code(), &VD0201);
    }
}
