//! Response cache implementation

use super::partition::{FifoPartition, Lookup};
use super::types::{AtomicCacheStats, CacheEntry, CacheStats, autocomplete_key, hit_ratio, route_key};
use crate::config::{CacheConfig, EndpointKey};
use crate::core::clock::{self, Clock};
use crate::core::types::{PlaceSuggestion, RouteEstimate};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::Ordering;
use tracing::{debug, info};

/// Process-wide response cache
///
/// Shared by every orchestrator through an `Arc`. No operation fails: a
/// disabled cache answers every lookup with a miss and ignores writes.
pub struct ResponseCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    routes: Mutex<FifoPartition<RouteEstimate>>,
    suggestions: Mutex<FifoPartition<Vec<PlaceSuggestion>>>,
    stats: AtomicCacheStats,
}

impl ResponseCache {
    /// Create a new cache
    pub fn new(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            routes: Mutex::new(FifoPartition::new(config.max_entries_per_endpoint)),
            suggestions: Mutex::new(FifoPartition::new(config.max_autocomplete_entries)),
            config,
            clock,
            stats: AtomicCacheStats::default(),
        }
    }

    /// Whether caching is enabled
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    fn key_for(&self, endpoint: EndpointKey, origin: &str, destination: &str) -> String {
        let hour = self
            .config
            .include_traffic_in_key
            .then(|| clock::local_hour(self.clock.now_ms()));
        route_key(endpoint, origin, destination, hour)
    }

    /// Get a cached route lookup
    pub fn get(
        &self,
        endpoint: EndpointKey,
        origin: &str,
        destination: &str,
    ) -> Option<Arc<RouteEstimate>> {
        if !self.config.enabled {
            return None;
        }

        let key = self.key_for(endpoint, origin, destination);
        let now = self.clock.now_ms();
        let lookup = self.routes.lock().lookup(&key, now, self.config.ttl_ms);

        match lookup {
            Lookup::Hit(data) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Cache hit for key: {}", key);
                Some(data)
            }
            Lookup::Expired => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                self.stats.evictions.fetch_add(1, Ordering::Relaxed);
                debug!("Cache entry expired for key: {}", key);
                None
            }
            Lookup::Miss => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a route lookup
    pub fn set(&self, endpoint: EndpointKey, origin: &str, destination: &str, data: RouteEstimate) {
        if !self.config.enabled {
            return;
        }

        let key = self.key_for(endpoint, origin, destination);
        let entry = CacheEntry::new(data, self.clock.now_ms());
        let evicted = self.routes.lock().insert(key.clone(), entry);

        if let Some(old) = evicted {
            self.stats.evictions.fetch_add(1, Ordering::Relaxed);
            debug!("Evicted oldest cache entry: {}", old);
        }
        debug!("Cached response for key: {}", key);
    }

    /// Get cached autocomplete results
    pub fn get_autocomplete(&self, query: &str) -> Option<Arc<Vec<PlaceSuggestion>>> {
        if !self.config.enabled {
            return None;
        }
        let key = autocomplete_key(query)?;

        let now = self.clock.now_ms();
        let lookup = self
            .suggestions
            .lock()
            .lookup(&key, now, self.config.autocomplete_ttl_ms);

        match lookup {
            Lookup::Hit(data) => {
                self.stats.autocomplete_hits.fetch_add(1, Ordering::Relaxed);
                debug!("Autocomplete cache hit for: {:?}", query);
                Some(data)
            }
            Lookup::Expired => {
                self.stats
                    .autocomplete_misses
                    .fetch_add(1, Ordering::Relaxed);
                self.stats
                    .autocomplete_evictions
                    .fetch_add(1, Ordering::Relaxed);
                debug!("Autocomplete entry expired for: {:?}", query);
                None
            }
            Lookup::Miss => {
                self.stats
                    .autocomplete_misses
                    .fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store autocomplete results
    pub fn set_autocomplete(&self, query: &str, results: Vec<PlaceSuggestion>) {
        if !self.config.enabled {
            return;
        }
        let Some(key) = autocomplete_key(query) else {
            return;
        };

        let entry = CacheEntry::new(results, self.clock.now_ms());
        if let Some(old) = self.suggestions.lock().insert(key, entry) {
            self.stats
                .autocomplete_evictions
                .fetch_add(1, Ordering::Relaxed);
            debug!("Evicted oldest autocomplete entry: {}", old);
        }
        debug!("Cached autocomplete results for: {:?}", query);
    }

    /// Drop every entry in both partitions and zero all counters
    pub fn clear(&self) {
        self.routes.lock().clear();
        self.suggestions.lock().clear();
        self.stats.reset_routes();
        self.stats.reset_autocomplete();
        info!("Response cache cleared");
    }

    /// Drop exactly one route entry; returns whether it was present
    pub fn clear_entry(&self, endpoint: EndpointKey, origin: &str, destination: &str) -> bool {
        let key = self.key_for(endpoint, origin, destination);
        let removed = self.routes.lock().remove(&key);
        if removed {
            info!("Cleared cache for {}: {} -> {}", endpoint, origin, destination);
        }
        removed
    }

    /// Drop every autocomplete entry and zero its counters
    pub fn clear_autocomplete(&self) {
        self.suggestions.lock().clear();
        self.stats.reset_autocomplete();
        info!("Autocomplete cache cleared");
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let hits = self.stats.hits.load(Ordering::Relaxed);
        let misses = self.stats.misses.load(Ordering::Relaxed);
        let autocomplete_hits = self.stats.autocomplete_hits.load(Ordering::Relaxed);
        let autocomplete_misses = self.stats.autocomplete_misses.load(Ordering::Relaxed);

        CacheStats {
            hits,
            misses,
            hit_ratio: hit_ratio(hits, misses),
            autocomplete_hits,
            autocomplete_misses,
            autocomplete_hit_ratio: hit_ratio(autocomplete_hits, autocomplete_misses),
            cache_size: self.routes.lock().len(),
            autocomplete_cache_size: self.suggestions.lock().len(),
            evictions: self.stats.evictions.load(Ordering::Relaxed),
            autocomplete_evictions: self.stats.autocomplete_evictions.load(Ordering::Relaxed),
        }
    }
}

impl std::fmt::Debug for ResponseCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseCache")
            .field("config", &self.config)
            .field("stats", &self.stats())
            .finish()
    }
}
