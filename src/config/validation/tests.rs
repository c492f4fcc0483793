//! Tests for configuration validation

#[cfg(test)]
mod tests {
    use super::super::trait_def::Validate;
    use crate::config::models::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EstimatorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_endpoint_config_validation() {
        let mut config = EndpointConfig::builtin(EndpointKey::Directions);
        assert!(config.validate().is_ok());

        config.requests_per_minute = 0;
        assert!(config.validate().is_err());

        config.requests_per_minute = 30;
        config.url = "places-autocomplete".to_string();
        assert!(config.validate().is_err());

        config.url = "ftp://maps.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_backoff_config_validation() {
        let mut backoff = BackoffConfig::default();
        assert!(backoff.validate().is_ok());

        backoff.multiplier = 0.5;
        assert!(backoff.validate().is_err());

        backoff.multiplier = 2.0;
        backoff.max_delay_ms = 10;
        assert!(backoff.validate().is_err());

        // Disabled backoff is never inspected
        backoff.enabled = false;
        assert!(backoff.validate().is_ok());
    }

    #[test]
    fn test_quota_config_validation() {
        let mut quota = QuotaConfig::default();
        assert!(quota.validate().is_ok());

        quota.warning_threshold_percent = 99.0;
        assert!(quota.validate().is_err());

        quota.warning_threshold_percent = 80.0;
        quota.monthly_requests = 10;
        assert!(quota.validate().is_err());
    }

    #[test]
    fn test_cache_config_validation() {
        let mut cache = CacheConfig::default();
        assert!(cache.validate().is_ok());

        cache.max_entries_per_endpoint = 0;
        assert!(cache.validate().is_err());

        cache.enabled = false;
        assert!(cache.validate().is_ok());
    }

    #[test]
    fn test_estimator_config_propagates_endpoint_errors() {
        let mut config = EstimatorConfig::default();
        if let Some(endpoint) = config.endpoints.get_mut(&EndpointKey::Autocomplete) {
            endpoint.name = String::new();
        }
        assert!(config.validate().is_err());
    }
}
