//! Top-level estimator configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Main estimator configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EstimatorConfig {
    /// Mapping provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Per-endpoint limits; missing endpoints fall back to built-in limits
    #[serde(default = "default_endpoints")]
    pub endpoints: HashMap<EndpointKey, EndpointConfig>,
    /// Global quota ceilings
    #[serde(default)]
    pub quota: QuotaConfig,
    /// Response cache
    #[serde(default)]
    pub cache: CacheConfig,
    /// Orchestration settings
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Suggestion settings
    #[serde(default)]
    pub autocomplete: AutocompleteConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            endpoints: default_endpoints(),
            quota: QuotaConfig::default(),
            cache: CacheConfig::default(),
            fetch: FetchConfig::default(),
            autocomplete: AutocompleteConfig::default(),
        }
    }
}

impl EstimatorConfig {
    /// Fill in built-in limits for endpoints the file did not mention
    pub fn with_builtin_endpoints(mut self) -> Self {
        for key in EndpointKey::ALL {
            self.endpoints
                .entry(key)
                .or_insert_with(|| EndpointConfig::builtin(key));
        }
        self
    }

    /// Build configuration from environment variables
    pub fn from_env() -> crate::utils::error::Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Override values that may come from the environment
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GOOGLE_MAPS_API_KEY") {
            if !key.trim().is_empty() {
                self.provider.api_key = Some(key);
            }
        }
        if let Ok(region) = std::env::var("FARE_ESTIMATOR_REGION") {
            if !region.trim().is_empty() {
                self.provider.region = region;
            }
        }
    }
}
