//! Per-endpoint admission and backoff configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// A distinct class of outbound call against the mapping provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointKey {
    /// Origin/destination distance and duration lookups
    DistanceMatrix,
    /// Turn-by-turn route lookups
    Directions,
    /// Place search
    Places,
    /// Free-text place suggestions
    Autocomplete,
}

impl EndpointKey {
    /// Every endpoint the estimator knows about, in display order
    pub const ALL: [EndpointKey; 4] = [
        EndpointKey::DistanceMatrix,
        EndpointKey::Directions,
        EndpointKey::Places,
        EndpointKey::Autocomplete,
    ];

    /// Stable identifier, also used as the cache key prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointKey::DistanceMatrix => "distance_matrix",
            EndpointKey::Directions => "directions",
            EndpointKey::Places => "places",
            EndpointKey::Autocomplete => "autocomplete",
        }
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exponential backoff policy applied after retryable failures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackoffConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Delay used for the first failure after a success
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Ceiling for any single delay
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
    /// Growth factor applied after each delay is handed out
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
        }
    }
}

/// Static limits for one endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EndpointConfig {
    /// Display name
    pub name: String,
    /// Request URL (or identifier for endpoints served by an SDK)
    pub url: String,
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
    #[serde(default = "default_requests_per_hour")]
    pub requests_per_hour: u32,
    #[serde(default = "default_requests_per_day")]
    pub requests_per_day: u32,
    #[serde(default)]
    pub backoff: BackoffConfig,
    #[serde(default = "default_retryable_errors")]
    pub retryable_errors: BTreeSet<u16>,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

impl EndpointConfig {
    /// Built-in limits for an endpoint
    pub fn builtin(key: EndpointKey) -> Self {
        match key {
            EndpointKey::DistanceMatrix => Self {
                name: "Distance Matrix".to_string(),
                url: "https://maps.googleapis.com/maps/api/distancematrix/json".to_string(),
                min_interval_ms: 1000,
                requests_per_minute: 30,
                requests_per_hour: 1000,
                requests_per_day: 25_000,
                backoff: BackoffConfig::default(),
                retryable_errors: default_retryable_errors(),
                max_retries: 3,
            },
            EndpointKey::Directions => Self {
                name: "Directions API".to_string(),
                url: "https://maps.googleapis.com/maps/api/directions/json".to_string(),
                min_interval_ms: 1000,
                requests_per_minute: 30,
                requests_per_hour: 1200,
                requests_per_day: 25_000,
                backoff: BackoffConfig::default(),
                retryable_errors: default_retryable_errors(),
                max_retries: 3,
            },
            EndpointKey::Places => Self {
                name: "Places API".to_string(),
                url: "https://maps.googleapis.com/maps/api/place/autocomplete/json".to_string(),
                min_interval_ms: 1000,
                requests_per_minute: 30,
                requests_per_hour: 1500,
                requests_per_day: 30_000,
                backoff: BackoffConfig {
                    enabled: true,
                    initial_delay_ms: 500,
                    max_delay_ms: 30_000,
                    multiplier: 1.5,
                },
                retryable_errors: default_retryable_errors(),
                max_retries: 2,
            },
            // Autocomplete fires on keystrokes, so it is throttled hard to keep costs down
            EndpointKey::Autocomplete => Self {
                name: "Autocomplete".to_string(),
                url: "https://maps.googleapis.com/maps/api/place/autocomplete/json".to_string(),
                min_interval_ms: 1500,
                requests_per_minute: 10,
                requests_per_hour: 100,
                requests_per_day: 500,
                backoff: BackoffConfig {
                    enabled: true,
                    initial_delay_ms: 2000,
                    max_delay_ms: 60_000,
                    multiplier: 2.0,
                },
                retryable_errors: default_retryable_errors(),
                max_retries: 1,
            },
        }
    }

    /// Whether a status code may be retried on this endpoint
    pub fn is_retryable(&self, status_code: u16) -> bool {
        self.retryable_errors.contains(&status_code)
    }
}

/// Built-in configuration for every endpoint
pub fn default_endpoints() -> HashMap<EndpointKey, EndpointConfig> {
    EndpointKey::ALL
        .iter()
        .map(|key| (*key, EndpointConfig::builtin(*key)))
        .collect()
}
