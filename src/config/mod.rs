//! Configuration management for the estimator
//!
//! Configuration is static: it is loaded once at startup from a YAML file
//! and/or the environment, validated, and never reloaded.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{FareError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the estimator
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Estimator configuration
    pub estimator: EstimatorConfig,
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FareError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml_str(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse configuration from YAML text, then apply environment overrides
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let mut estimator: EstimatorConfig = serde_yaml::from_str(content)
            .map_err(|e| FareError::Config(format!("Failed to parse config: {}", e)))?;
        estimator.apply_env();

        let config = Self {
            estimator: estimator.with_builtin_endpoints(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables (and a `.env` file if present)
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        let _ = dotenvy::dotenv();

        let config = Self {
            estimator: EstimatorConfig::from_env()?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Get provider configuration
    pub fn provider(&self) -> &ProviderConfig {
        &self.estimator.provider
    }

    /// Get quota configuration
    pub fn quota(&self) -> &QuotaConfig {
        &self.estimator.quota
    }

    /// Get cache configuration
    pub fn cache(&self) -> &CacheConfig {
        &self.estimator.cache
    }

    /// Get autocomplete configuration
    pub fn autocomplete(&self) -> &AutocompleteConfig {
        &self.estimator.autocomplete
    }

    /// Get configuration for one endpoint
    pub fn endpoint(&self, key: EndpointKey) -> Option<&EndpointConfig> {
        self.estimator.endpoints.get(&key)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.estimator
            .validate()
            .map_err(|e| FareError::Config(format!("Invalid configuration: {}", e)))?;

        if self.estimator.provider.api_key().is_none() {
            tracing::warn!("No mapping provider API key configured; only cached and local data is available");
        }

        debug!("Configuration validation completed");
        Ok(())
    }
}
