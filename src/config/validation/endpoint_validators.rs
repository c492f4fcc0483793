//! Endpoint validators
//!
//! Limits of zero would make an endpoint permanently unusable, and a backoff
//! multiplier below one would shrink delays instead of growing them.

use super::trait_def::Validate;
use crate::config::models::*;
use url::Url;

impl Validate for BackoffConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.initial_delay_ms == 0 {
            return Err("Backoff initial delay must be greater than 0".to_string());
        }

        if self.max_delay_ms < self.initial_delay_ms {
            return Err(format!(
                "Backoff max delay ({}ms) must not be below the initial delay ({}ms)",
                self.max_delay_ms, self.initial_delay_ms
            ));
        }

        if !self.multiplier.is_finite() || self.multiplier < 1.0 {
            return Err("Backoff multiplier must be at least 1.0".to_string());
        }

        Ok(())
    }
}

impl Validate for EndpointConfig {
    fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Endpoint name cannot be empty".to_string());
        }

        let url = Url::parse(&self.url)
            .map_err(|e| format!("Endpoint {} has invalid URL: {}", self.name, e))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "Endpoint {} must use http:// or https://, got: {}",
                self.name,
                url.scheme()
            ));
        }

        if self.requests_per_minute == 0 {
            return Err(format!("Endpoint {} requests per minute must be greater than 0", self.name));
        }

        if self.requests_per_hour == 0 {
            return Err(format!("Endpoint {} requests per hour must be greater than 0", self.name));
        }

        if self.requests_per_day == 0 {
            return Err(format!("Endpoint {} requests per day must be greater than 0", self.name));
        }

        self.backoff
            .validate()
            .map_err(|e| format!("Endpoint {}: {}", self.name, e))
    }
}
