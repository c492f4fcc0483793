//! Response cache sitting in front of every provider call
//!
//! Two bounded partitions share one set of counters: route lookups keyed by
//! `endpoint|origin|destination[|hour]` with a short TTL, and autocomplete
//! results keyed by normalized query text with a long TTL. Overflow evicts
//! the oldest-inserted entry (FIFO); expired entries are dropped when read.

mod partition;
pub mod response_cache;
pub mod types;


pub use response_cache::ResponseCache;
pub use types::{CacheEntry, CacheStats};
