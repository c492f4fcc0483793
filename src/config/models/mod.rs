//! Configuration data models
//!
//! This module defines all configuration structures used by the estimator.

#![allow(missing_docs)]

pub mod autocomplete;
pub mod cache;
pub mod endpoint;
pub mod estimator;
pub mod fetch;
pub mod provider;
pub mod quota;

// Re-export all configuration types
pub use autocomplete::*;
pub use cache::*;
pub use endpoint::*;
pub use estimator::*;
pub use fetch::*;
pub use provider::*;
pub use quota::*;

/// Default values for configuration
pub fn default_true() -> bool {
    true
}

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

/// Default minimum spacing between two calls to one endpoint
pub fn default_min_interval_ms() -> u64 {
    1000
}

pub fn default_requests_per_minute() -> u32 {
    30
}

pub fn default_requests_per_hour() -> u32 {
    1000
}

pub fn default_requests_per_day() -> u32 {
    25_000
}

/// Default maximum retry attempts
pub fn default_max_retries() -> u32 {
    3
}

pub fn default_initial_delay_ms() -> u64 {
    1000
}

pub fn default_max_delay_ms() -> u64 {
    60_000
}

pub fn default_multiplier() -> f64 {
    2.0
}

/// HTTP statuses worth retrying: timeout, throttling and server-side failures
pub fn default_retryable_errors() -> std::collections::BTreeSet<u16> {
    [408, 429, 500, 502, 503, 504].into_iter().collect()
}

pub fn default_daily_requests() -> u64 {
    1000
}

pub fn default_monthly_requests() -> u64 {
    25_000
}

pub fn default_warning_threshold() -> f64 {
    80.0
}

pub fn default_critical_threshold() -> f64 {
    95.0
}

pub fn default_cache_ttl_ms() -> u64 {
    300_000 // 5 minutes
}

pub fn default_autocomplete_ttl_ms() -> u64 {
    86_400_000 // 24 hours
}

pub fn default_max_entries_per_endpoint() -> usize {
    100
}

pub fn default_max_autocomplete_entries() -> usize {
    200
}

pub fn default_retry_grace_ms() -> u64 {
    250
}

pub fn default_min_query_chars() -> usize {
    5
}

pub fn default_max_results() -> usize {
    5
}

pub fn default_region() -> String {
    "in".to_string()
}

pub fn default_bias_lat() -> f64 {
    26.1445
}

pub fn default_bias_lng() -> f64 {
    91.7362
}

pub fn default_bias_radius_m() -> u32 {
    50_000
}
