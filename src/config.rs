//! Engine configuration
//!
//! Every tunable lives here with a serde default so partial config files
//! work. `EngineConfig::load` overlays a file with `VERITAS_*` environment
//! variables.

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Source aggregation settings
    #[serde(default)]
    pub aggregator: AggregatorConfig,

    /// Provider response cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Verification session settings
    #[serde(default)]
    pub session: SessionConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aggregator: AggregatorConfig::default(),
            cache: CacheConfig::default(),
            session: SessionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a file, overlaid with `VERITAS_*` env vars.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(config::Environment::with_prefix("VERITAS").separator("__"))
            .build()
            .map_err(|e| EngineError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| EngineError::Configuration(e.to_string()))
    }
}

/// Source aggregation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum providers consulted per fact
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,

    /// Records with less content than this are discarded
    #[serde(default = "default_min_content_length")]
    pub min_content_length: usize,

    /// Fetch timeout when a provider has no configured timeout
    #[serde(default = "default_fetch_timeout_ms")]
    pub default_fetch_timeout_ms: u64,
}

fn default_max_sources() -> usize {
    5
}

fn default_min_content_length() -> usize {
    50
}

fn default_fetch_timeout_ms() -> u64 {
    10_000
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            max_sources: default_max_sources(),
            min_content_length: default_min_content_length(),
            default_fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

impl AggregatorConfig {
    pub fn default_fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.default_fetch_timeout_ms)
    }
}

/// Provider response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Time-to-live for cached responses, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub ttl_secs: u64,

    /// Maximum cached responses before the oldest is evicted
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
}

fn default_cache_ttl_secs() -> u64 {
    300
}

fn default_cache_max_entries() -> usize {
    1000
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl_secs(),
            max_entries: default_cache_max_entries(),
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

/// Verification session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Completed/failed sessions older than this are removed by cleanup
    #[serde(default = "default_retention_secs")]
    pub retention_secs: i64,

    /// A fact is `verified` only above this confidence, given a resolution
    #[serde(default = "default_verified_threshold")]
    pub verified_threshold: f32,

    /// Sessions with more facts than this fail outright
    #[serde(default = "default_max_facts")]
    pub max_facts: usize,
}

fn default_max_facts() -> usize {
    64
}

fn default_retention_secs() -> i64 {
    3600
}

fn default_verified_threshold() -> f32 {
    0.6
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            retention_secs: default_retention_secs(),
            verified_threshold: default_verified_threshold(),
            max_facts: default_max_facts(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.aggregator.max_sources, 5);
        assert_eq!(config.aggregator.min_content_length, 50);
        assert_eq!(config.cache.ttl_secs, 300);
        assert_eq!(config.session.retention_secs, 3600);
        assert!((config.session.verified_threshold - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{ "aggregator": { "max_sources": 3 } }"#).unwrap();
        assert_eq!(config.aggregator.max_sources, 3);
        assert_eq!(config.aggregator.min_content_length, 50);
        assert_eq!(config.cache.max_entries, 1000);
    }
}
