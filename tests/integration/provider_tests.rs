//! Google provider integration tests
//!
//! Each test runs the HTTP provider against a local `wiremock` server.

#[cfg(test)]
mod tests {
    use crate::common::{
        AUTOCOMPLETE_PATH, DIRECTIONS_PATH, DISTANCE_MATRIX_PATH, TEST_API_KEY, estimator_config,
        fixtures,
    };
    use fare_estimator::config::EndpointKey;
    use fare_estimator::core::providers::{GoogleMapsProvider, MapsProvider, ProviderError};
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn provider_for(server: &MockServer) -> GoogleMapsProvider {
        GoogleMapsProvider::new(&estimator_config(&server.uri(), Some(TEST_API_KEY))).unwrap()
    }

    #[tokio::test]
    async fn test_directions_request_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .and(query_param("origin", "Ulubari"))
            .and(query_param("destination", "Beltola"))
            .and(query_param("mode", "driving"))
            .and(query_param("departure_time", "now"))
            .and(query_param("region", "in"))
            .and(query_param("key", TEST_API_KEY))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(fixtures::directions(8_200, 1_200, Some(1_500))),
            )
            .expect(1)
            .mount(&server)
            .await;

        let leg = provider_for(&server)
            .await
            .directions("Ulubari", "Beltola")
            .await
            .unwrap();

        assert_eq!(leg.distance_meters, 8_200);
        assert_eq!(leg.duration_seconds, 1_200);
        assert_eq!(leg.duration_in_traffic_seconds, Some(1_500));
        assert_eq!(leg.summary.as_deref(), Some("GS Road"));
    }

    #[tokio::test]
    async fn test_distance_matrix_dispatch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DISTANCE_MATRIX_PATH))
            .and(query_param("origins", "Ulubari"))
            .and(query_param("destinations", "Beltola"))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::distance_matrix(7_900, 1_080)))
            .expect(1)
            .mount(&server)
            .await;

        let provider = provider_for(&server).await;
        let leg = provider
            .route(EndpointKey::DistanceMatrix, "Ulubari", "Beltola")
            .await
            .unwrap();

        assert_eq!(leg.distance_meters, 7_900);
        assert_eq!(leg.duration_in_traffic_seconds, None);
        assert_eq!(leg.traffic_seconds(), 1_080);
    }

    #[tokio::test]
    async fn test_http_error_maps_to_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .directions("Ulubari", "Beltola")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 503);
        assert_eq!(err.user_message(), "Service temporarily unavailable. Please retry.");
    }

    #[tokio::test]
    async fn test_provider_status_maps_to_status_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::status(
                "OVER_QUERY_LIMIT",
                Some("You have exceeded your rate-limit for this API."),
            )))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .directions("Ulubari", "Beltola")
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), 429);
        assert!(matches!(err, ProviderError::Status { ref status, .. } if status == "OVER_QUERY_LIMIT"));
    }

    #[tokio::test]
    async fn test_undecodable_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DISTANCE_MATRIX_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .distance_matrix("Ulubari", "Beltola")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(DIRECTIONS_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::directions(1_000, 120, None))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .await
            .directions("Ulubari", "Beltola")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Timeout(_)));
        assert_eq!(err.status_code(), 408);
    }

    #[tokio::test]
    async fn test_missing_key_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let provider = GoogleMapsProvider::new(&estimator_config(&server.uri(), Some("  "))).unwrap();

        assert!(!provider.has_credentials());
        assert_eq!(
            provider.directions("Ulubari", "Beltola").await.unwrap_err(),
            ProviderError::MissingCredentials
        );
        assert_eq!(
            provider.autocomplete("Beltola").await.unwrap_err(),
            ProviderError::MissingCredentials
        );
    }

    #[tokio::test]
    async fn test_autocomplete_request_and_parse() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(AUTOCOMPLETE_PATH))
            .and(query_param("input", "Beltola"))
            .and(query_param("components", "country:in"))
            .and(query_param("radius", "50000"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(fixtures::autocomplete(&["Beltola Bazar", "Beltola Tiniali"])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let suggestions = provider_for(&server).await.autocomplete("Beltola").await.unwrap();

        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].name, "Beltola Bazar");
        assert_eq!(suggestions[0].full_address, "Beltola Bazar, Guwahati, Assam, India");
        assert_eq!(suggestions[0].place_id.as_deref(), Some("place-beltola-bazar"));
        assert_eq!(suggestions[1].kind, "google");
    }

    #[tokio::test]
    async fn test_autocomplete_zero_results_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(AUTOCOMPLETE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(fixtures::status("ZERO_RESULTS", None)))
            .mount(&server)
            .await;

        let suggestions = provider_for(&server).await.autocomplete("Nowhere at all").await.unwrap();
        assert!(suggestions.is_empty());
    }
}
