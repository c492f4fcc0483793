//! Bounded, insertion-ordered map used by each cache partition

use super::types::CacheEntry;
use lru::LruCache;
use std::sync::Arc;

/// Outcome of a partition lookup
pub(super) enum Lookup<T> {
    Hit(Arc<T>),
    Miss,
    Expired,
}

/// Insertion-ordered store with a hard capacity
///
/// Reads go through `peek`, which leaves recency untouched, so the
/// least-recently-used slot of the underlying `LruCache` is always the
/// oldest insertion. Overwriting a key keeps its original position.
pub(super) struct FifoPartition<T> {
    entries: LruCache<String, CacheEntry<T>>,
    capacity: usize,
}

impl<T> FifoPartition<T> {
    pub(super) fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::unbounded(),
            capacity: capacity.max(1),
        }
    }

    /// Look up a key, dropping it if older than `ttl_ms`
    pub(super) fn lookup(&mut self, key: &str, now_ms: i64, ttl_ms: u64) -> Lookup<T> {
        let expired = match self.entries.peek(key) {
            None => return Lookup::Miss,
            Some(entry) => entry.is_expired(now_ms, ttl_ms),
        };

        if expired {
            self.entries.pop(key);
            return Lookup::Expired;
        }

        match self.entries.peek(key) {
            Some(entry) => Lookup::Hit(Arc::clone(&entry.data)),
            None => Lookup::Miss,
        }
    }

    /// Insert or overwrite; returns the key evicted to make room, if any
    pub(super) fn insert(&mut self, key: String, entry: CacheEntry<T>) -> Option<String> {
        if let Some(existing) = self.entries.peek_mut(&key) {
            *existing = entry;
            return None;
        }

        let evicted = if self.entries.len() >= self.capacity {
            self.entries.pop_lru().map(|(old_key, _)| old_key)
        } else {
            None
        };

        self.entries.push(key, entry);
        evicted
    }

    pub(super) fn remove(&mut self, key: &str) -> bool {
        self.entries.pop(key).is_some()
    }

    pub(super) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(super) fn len(&self) -> usize {
        self.entries.len()
    }
}
