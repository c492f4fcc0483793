//! Cache and quota validators

use super::trait_def::Validate;
use crate::config::models::*;

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.enabled {
            return Ok(());
        }

        if self.ttl_ms == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        if self.autocomplete_ttl_ms == 0 {
            return Err("Autocomplete cache TTL must be greater than 0".to_string());
        }

        if self.max_entries_per_endpoint == 0 {
            return Err("Cache max entries must be greater than 0".to_string());
        }

        if self.max_autocomplete_entries == 0 {
            return Err("Autocomplete cache max entries must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for QuotaConfig {
    fn validate(&self) -> Result<(), String> {
        if self.daily_requests == 0 {
            return Err("Daily quota must be greater than 0".to_string());
        }

        if self.monthly_requests < self.daily_requests {
            return Err("Monthly quota must not be below the daily quota".to_string());
        }

        let in_range = |pct: f64| pct.is_finite() && pct > 0.0 && pct <= 100.0;
        if !in_range(self.warning_threshold_percent) || !in_range(self.critical_threshold_percent)
        {
            return Err("Quota thresholds must be between 0 and 100".to_string());
        }

        if self.warning_threshold_percent > self.critical_threshold_percent {
            return Err("Quota warning threshold must not exceed the critical threshold".to_string());
        }

        Ok(())
    }
}
