//! Mapping provider configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Mapping provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// API key; usually supplied through `GOOGLE_MAPS_API_KEY`
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Country restriction for suggestions and region bias for routes
    #[serde(default = "default_region")]
    pub region: String,
    /// Response language
    #[serde(default)]
    pub language: Option<String>,
    /// Ask for traffic-aware durations by departing now
    #[serde(default = "default_true")]
    pub departure_time_now: bool,
    /// Centre of the suggestion bias circle
    #[serde(default = "default_bias_lat")]
    pub bias_lat: f64,
    #[serde(default = "default_bias_lng")]
    pub bias_lng: f64,
    /// Radius of the suggestion bias circle in metres
    #[serde(default = "default_bias_radius_m")]
    pub bias_radius_m: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout: default_timeout(),
            region: default_region(),
            language: None,
            departure_time_now: true,
            bias_lat: default_bias_lat(),
            bias_lng: default_bias_lng(),
            bias_radius_m: default_bias_radius_m(),
        }
    }
}

impl ProviderConfig {
    /// The configured key, ignoring blank values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
