//! Cache type definitions
//!
//! Entries, key construction and statistics for the response cache.

use crate::config::EndpointKey;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache entry with its insertion instant
///
/// The payload is shared through an `Arc` and must be treated as immutable:
/// every reader of the same key observes the same value.
#[derive(Debug)]
pub struct CacheEntry<T> {
    /// The cached value
    pub data: Arc<T>,
    /// When the entry was written, in epoch milliseconds
    pub timestamp_ms: i64,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry
    pub fn new(data: T, now_ms: i64) -> Self {
        Self {
            data: Arc::new(data),
            timestamp_ms: now_ms,
        }
    }

    /// Check if the entry is older than `ttl_ms`
    pub fn is_expired(&self, now_ms: i64, ttl_ms: u64) -> bool {
        let ttl_ms = i64::try_from(ttl_ms).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.timestamp_ms) > ttl_ms
    }
}

/// Build the key for a route lookup
pub fn route_key(
    endpoint: EndpointKey,
    origin: &str,
    destination: &str,
    hour_bucket: Option<u32>,
) -> String {
    match hour_bucket {
        Some(hour) => format!("{}|{}|{}|{}", endpoint.as_str(), origin, destination, hour),
        None => format!("{}|{}|{}", endpoint.as_str(), origin, destination),
    }
}

/// Build the key for an autocomplete query, or `None` for a blank query
pub fn autocomplete_key(query: &str) -> Option<String> {
    let normalized = query.trim().to_lowercase();
    if normalized.is_empty() {
        None
    } else {
        Some(format!("autocomplete|{}", normalized))
    }
}

/// Hit ratio as a percentage, `0.0` when nothing was looked up
pub fn hit_ratio(hits: u64, misses: u64) -> f64 {
    let total = hits + misses;
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

/// Atomic cache statistics for lock-free hot path updates
#[derive(Debug, Default)]
pub struct AtomicCacheStats {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub autocomplete_hits: AtomicU64,
    pub autocomplete_misses: AtomicU64,
    /// Route entries dropped by overflow or TTL expiry
    pub evictions: AtomicU64,
    /// Autocomplete entries dropped by overflow or TTL expiry
    pub autocomplete_evictions: AtomicU64,
}

impl AtomicCacheStats {
    /// Reset the route counters
    pub fn reset_routes(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    /// Reset the autocomplete counters
    pub fn reset_autocomplete(&self) {
        self.autocomplete_hits.store(0, Ordering::Relaxed);
        self.autocomplete_misses.store(0, Ordering::Relaxed);
        self.autocomplete_evictions.store(0, Ordering::Relaxed);
    }
}

/// Cache statistics snapshot (returned to callers)
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Percentage of route lookups served from cache
    pub hit_ratio: f64,
    pub autocomplete_hits: u64,
    pub autocomplete_misses: u64,
    pub autocomplete_hit_ratio: f64,
    pub cache_size: usize,
    pub autocomplete_cache_size: usize,
    pub evictions: u64,
    pub autocomplete_evictions: u64,
}

impl CacheStats {
    /// Route hit ratio as shown to operators, e.g. `"75.0%"` or `"0%"`
    pub fn hit_ratio_label(&self) -> String {
        ratio_label(self.hits, self.misses, self.hit_ratio)
    }

    /// Autocomplete hit ratio as shown to operators
    pub fn autocomplete_hit_ratio_label(&self) -> String {
        ratio_label(
            self.autocomplete_hits,
            self.autocomplete_misses,
            self.autocomplete_hit_ratio,
        )
    }
}

fn ratio_label(hits: u64, misses: u64, ratio: f64) -> String {
    if hits + misses == 0 {
        "0%".to_string()
    } else {
        format!("{:.1}%", ratio)
    }
}
