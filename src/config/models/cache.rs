//! Cache configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheConfig {
    /// Enable caching
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// TTL for route lookups in milliseconds
    #[serde(default = "default_cache_ttl_ms")]
    pub ttl_ms: u64,
    /// TTL for autocomplete results in milliseconds
    #[serde(default = "default_autocomplete_ttl_ms")]
    pub autocomplete_ttl_ms: u64,
    #[serde(default = "default_max_entries_per_endpoint")]
    pub max_entries_per_endpoint: usize,
    #[serde(default = "default_max_autocomplete_entries")]
    pub max_autocomplete_entries: usize,
    /// Add the local hour of day to route keys so traffic-dependent
    /// durations are not reused across traffic regimes
    #[serde(default = "default_true")]
    pub include_traffic_in_key: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_ms: default_cache_ttl_ms(),
            autocomplete_ttl_ms: default_autocomplete_ttl_ms(),
            max_entries_per_endpoint: default_max_entries_per_endpoint(),
            max_autocomplete_entries: default_max_autocomplete_entries(),
            include_traffic_in_key: true,
        }
    }
}
