//! Top-level configuration validators

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::warn;

impl Validate for EstimatorConfig {
    fn validate(&self) -> Result<(), String> {
        self.provider.validate()?;

        for key in EndpointKey::ALL {
            match self.endpoints.get(&key) {
                Some(endpoint) => endpoint.validate()?,
                None => warn!("No configuration for endpoint {}; calls to it will be refused", key),
            }
        }

        self.quota.validate()?;
        self.cache.validate()?;
        self.autocomplete.validate()?;

        Ok(())
    }
}

impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout == 0 {
            return Err("Provider timeout must be greater than 0".to_string());
        }

        if self.region.trim().is_empty() {
            return Err("Provider region cannot be empty".to_string());
        }

        if !(-90.0..=90.0).contains(&self.bias_lat) || !(-180.0..=180.0).contains(&self.bias_lng) {
            return Err("Provider bias location is out of range".to_string());
        }

        Ok(())
    }
}

impl Validate for AutocompleteConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_results == 0 {
            return Err("Autocomplete max results must be greater than 0".to_string());
        }

        Ok(())
    }
}
