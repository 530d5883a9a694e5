//! Per-namespace sizing and expiry settings

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upper bound for `ttl_secs` (30 days)
pub const MAX_TTL_SECS: u64 = 60 * 60 * 24 * 30;

/// Settings for a single cache namespace.
///
/// `capacity_bytes` bounds the sum of key and value lengths held by the
/// namespace's store. `0` disables the bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NamespaceConfig {
    /// Registry key
    pub name: String,

    /// Byte budget for the store (0 = unbounded)
    #[serde(default)]
    pub capacity_bytes: u64,

    /// Entry time-to-live in seconds (None = entries never expire)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,

    /// Log every eviction at debug level
    #[serde(default)]
    pub enable_eviction_listener: bool,
}

impl NamespaceConfig {
    pub fn new(name: impl Into<String>, capacity_bytes: u64) -> Self {
        Self {
            name: name.into(),
            capacity_bytes,
            ttl_secs: None,
            enable_eviction_listener: false,
        }
    }

    pub fn capacity_bytes(mut self, capacity_bytes: u64) -> Self {
        self.capacity_bytes = capacity_bytes;
        self
    }

    pub fn ttl_secs(mut self, ttl_secs: u64) -> Self {
        self.ttl_secs = Some(ttl_secs);
        self
    }

    pub fn enable_eviction_listener(mut self, enabled: bool) -> Self {
        self.enable_eviction_listener = enabled;
        self
    }

    /// Time-to-live as a `Duration`
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity_bytes > 0
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if let Some(ttl) = self.ttl_secs {
            if ttl == 0 || ttl > MAX_TTL_SECS {
                return Err(ConfigError::range_with_hint(
                    "ttl_secs",
                    ttl,
                    1,
                    MAX_TTL_SECS,
                    "Omit ttl_secs to keep entries until they are evicted",
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let config = NamespaceConfig::new("images", 64 << 20);

        assert_eq!(config.name, "images");
        assert_eq!(config.capacity_bytes, 64 << 20);
        assert!(config.ttl().is_none());
        assert!(!config.enable_eviction_listener);
        assert!(config.is_bounded());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = NamespaceConfig::new("  ", 10).validate().unwrap_err();
        assert!(matches!(err, ConfigError::EmptyName));
    }

    #[test]
    fn test_ttl_range() {
        assert!(NamespaceConfig::new("a", 0).ttl_secs(60).validate().is_ok());
        assert!(NamespaceConfig::new("a", 0)
            .ttl_secs(MAX_TTL_SECS)
            .validate()
            .is_ok());

        let zero = NamespaceConfig::new("a", 0).ttl_secs(0).validate();
        assert!(matches!(zero, Err(ConfigError::Range { .. })));

        let too_long = NamespaceConfig::new("a", 0)
            .ttl_secs(MAX_TTL_SECS + 1)
            .validate();
        assert!(matches!(too_long, Err(ConfigError::Range { .. })));
    }

    #[test]
    fn test_unbounded_capacity() {
        let config = NamespaceConfig::new("a", 0);
        assert!(!config.is_bounded());
    }
}
