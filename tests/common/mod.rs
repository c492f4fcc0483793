//! Common test utilities for fare-estimator
//!
//! - `fixtures`: provider response bodies
//! - configuration helpers that route every endpoint to a mock server

pub mod fixtures;

use fare_estimator::config::{Config, EndpointKey, EstimatorConfig};

pub const TEST_API_KEY: &str = "test-key";

pub const DIRECTIONS_PATH: &str = "/maps/api/directions/json";
pub const DISTANCE_MATRIX_PATH: &str = "/maps/api/distancematrix/json";
pub const AUTOCOMPLETE_PATH: &str = "/maps/api/place/autocomplete/json";

/// Estimator configuration with every endpoint served by `base_url`
///
/// Minimum spacing is removed so consecutive test calls are admitted.
pub fn estimator_config(base_url: &str, api_key: Option<&str>) -> EstimatorConfig {
    let mut config = EstimatorConfig::default();
    config.provider.api_key = api_key.map(str::to_string);
    config.provider.timeout = 1;

    for (key, endpoint) in config.endpoints.iter_mut() {
        let path = match key {
            EndpointKey::Directions => DIRECTIONS_PATH,
            EndpointKey::DistanceMatrix => DISTANCE_MATRIX_PATH,
            EndpointKey::Places | EndpointKey::Autocomplete => AUTOCOMPLETE_PATH,
        };
        endpoint.url = format!("{}{}", base_url, path);
        endpoint.min_interval_ms = 0;
    }
    config
}

/// Full configuration wrapping [`estimator_config`]
pub fn config(base_url: &str, api_key: Option<&str>) -> Config {
    Config {
        estimator: estimator_config(base_url, api_key),
    }
}
