//! Configuration loading integration tests

#[cfg(test)]
mod tests {
    use fare_estimator::FareError;
    use fare_estimator::config::{Config, EndpointKey};
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_partial_file() {
        let file = write_config(
            r#"
provider:
  timeout: 5
  language: en
endpoints:
  directions:
    name: Directions API
    url: http://localhost:9000/maps/api/directions/json
    min_interval_ms: 0
    requests_per_minute: 2
quota:
  daily_requests: 50
  monthly_requests: 1000
cache:
  ttl_ms: 60000
autocomplete:
  enable_api: false
"#,
        );

        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.provider().timeout, 5);
        assert_eq!(config.provider().language.as_deref(), Some("en"));
        assert_eq!(config.quota().daily_requests, 50);
        assert_eq!(config.cache().ttl_ms, 60_000);
        assert_eq!(config.cache().max_entries_per_endpoint, 100);
        assert!(!config.autocomplete().enable_api);

        let directions = config.endpoint(EndpointKey::Directions).unwrap();
        assert_eq!(directions.requests_per_minute, 2);
        assert_eq!(directions.min_interval_ms, 0);
        assert_eq!(directions.max_retries, 3);

        // Endpoints absent from the file keep their built-in limits
        let autocomplete = config.endpoint(EndpointKey::Autocomplete).unwrap();
        assert_eq!(autocomplete.min_interval_ms, 1500);
        assert_eq!(autocomplete.requests_per_day, 500);
    }

    #[test]
    fn test_example_config_is_valid() {
        let config =
            Config::from_yaml_str(include_str!("../../config/estimator.yaml.example")).unwrap();

        assert_eq!(config.estimator.endpoints.len(), 4);
        let autocomplete = config.endpoint(EndpointKey::Autocomplete).unwrap();
        assert_eq!(autocomplete.backoff.initial_delay_ms, 2000);
        assert_eq!(autocomplete.backoff.max_delay_ms, 60_000);
        assert_eq!(config.cache().ttl_ms, 300_000);
    }

    #[tokio::test]
    async fn test_empty_file_uses_defaults() {
        let file = write_config("{}\n");
        let config = Config::from_file(file.path()).await.unwrap();

        assert_eq!(config.quota().daily_requests, 1000);
        assert_eq!(config.quota().monthly_requests, 25_000);
        assert_eq!(config.estimator.endpoints.len(), 4);
        assert_eq!(config.autocomplete().min_query_chars, 5);
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected() {
        let file = write_config(
            r#"
quota:
  daily_requests: 100
  monthly_requests: 10
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("Monthly quota"));
    }

    #[tokio::test]
    async fn test_bad_endpoint_url_is_rejected() {
        let file = write_config(
            r#"
endpoints:
  places:
    name: Places
    url: ftp://example.com/places
"#,
        );

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("http"));
    }

    #[tokio::test]
    async fn test_unparseable_file() {
        let file = write_config("quota: [not, a, map]\n");
        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, FareError::Config(_)));
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(dir.path().join("absent.yaml"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
