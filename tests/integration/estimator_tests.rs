//! Estimator integration tests
//!
//! Orchestrator, cache, limiter and the HTTP provider wired together the way
//! the binary wires them, against a mock provider.

#[cfg(test)]
mod tests {
    use crate::common::{AUTOCOMPLETE_PATH, DIRECTIONS_PATH, TEST_API_KEY, config, fixtures};
    use fare_estimator::config::EndpointKey;
    use fare_estimator::{DataSource, Estimator, FetchEvent, FetchStatus, TrafficLevel};
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_route_is_fetched_once_and_shared() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::directions(8_200, 1_200, Some(1_800))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let estimator = Estimator::new(config(&server.uri(), Some(TEST_API_KEY))).unwrap();

        let status = estimator.route(EndpointKey::Directions, "Ulubari", "Beltola").await;
        let route = status.value().expect("route");
        assert_eq!(route.distance_km, 8.2);
        assert_eq!(route.duration_min, 30.0);
        assert_eq!(route.traffic_level, TrafficLevel::High);

        let other = estimator.orchestrator_for();
        let status = other.fetch_route(EndpointKey::Directions, "Ulubari", "Beltola").await;
        assert!(matches!(
            status,
            FetchStatus::Ready {
                source: DataSource::Cache,
                ..
            }
        ));

        let snapshot = estimator.status();
        assert_eq!(snapshot.quota.daily.used, 1);
        assert_eq!(snapshot.cache.hits, 1);
        assert_eq!(snapshot.cache.misses, 1);
        assert_eq!(snapshot.cache.hit_ratio_label(), "50.0%");
    }

    #[tokio::test]
    async fn test_without_key_nothing_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let estimator = Estimator::new(config(&server.uri(), None)).unwrap();

        assert_eq!(
            estimator.route(EndpointKey::Directions, "Ulubari", "Beltola").await,
            FetchStatus::MissingCredentials
        );

        // Suggestions still come from the local directory
        let status = estimator.suggest("Beltola").await;
        assert!(matches!(
            status,
            FetchStatus::Ready {
                source: DataSource::Local,
                ..
            }
        ));
        assert_eq!(status.value().map(|s| s[0].name.as_str()), Some("Beltola"));
    }

    #[tokio::test]
    async fn test_server_error_is_retried_after_backoff() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::directions(5_000, 600, None)))
            .expect(1)
            .mount(&server)
            .await;

        let estimator = Estimator::new(config(&server.uri(), Some(TEST_API_KEY))).unwrap();
        let mut events = estimator.orchestrator().subscribe();

        let status = estimator.route(EndpointKey::Directions, "Dispur", "Khanapara").await;
        assert!(matches!(
            status,
            FetchStatus::Failed {
                code: 500,
                retry_scheduled: true,
                ..
            }
        ));

        let retried = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                if let Ok(FetchEvent::Route { status, .. }) = events.recv().await {
                    if status.is_ready() {
                        return status;
                    }
                }
            }
        })
        .await
        .expect("deferred retry did not complete");

        assert_eq!(retried.value().map(|r| r.distance_km), Some(5.0));
        assert_eq!(estimator.orchestrator().pending_retries(), 0);
    }

    #[tokio::test]
    async fn test_suggestions_merge_local_and_remote() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(AUTOCOMPLETE_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::autocomplete(&["Beltola", "Beltola Survey"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let estimator = Estimator::new(config(&server.uri(), Some(TEST_API_KEY))).unwrap();

        let status = estimator.suggest("Beltola").await;
        let names: Vec<String> = status
            .value()
            .expect("suggestions")
            .iter()
            .map(|s| s.name.clone())
            .collect();
        assert_eq!(names, vec!["Beltola", "Beltola Survey"]);

        // A second consumer is answered from the autocomplete cache
        let status = estimator.orchestrator_for().suggest("beltola").await;
        assert!(matches!(
            status,
            FetchStatus::Ready {
                source: DataSource::Cache,
                ..
            }
        ));
        assert_eq!(estimator.status().cache.autocomplete_cache_size, 1);
    }

    #[tokio::test]
    async fn test_reset_forgets_usage_and_cache() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::directions(3_000, 420, None)))
            .expect(2)
            .mount(&server)
            .await;

        let estimator = Estimator::new(config(&server.uri(), Some(TEST_API_KEY))).unwrap();
        assert!(estimator.route(EndpointKey::Directions, "Zoo Road", "Chandmari").await.is_ready());

        estimator.reset();
        let snapshot = estimator.status();
        assert_eq!(snapshot.quota.daily.used, 0);
        assert_eq!(snapshot.cache.cache_size, 0);

        let status = estimator.route(EndpointKey::Directions, "Zoo Road", "Chandmari").await;
        assert!(matches!(
            status,
            FetchStatus::Ready {
                source: DataSource::Network,
                ..
            }
        ));
    }
}
