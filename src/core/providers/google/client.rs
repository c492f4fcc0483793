//! Google Maps provider implementation

use super::models::{AutocompleteResponse, DirectionsResponse, DistanceMatrixResponse};
use crate::config::{EndpointConfig, EndpointKey, EstimatorConfig, ProviderConfig};
use crate::core::providers::{MapsProvider, ProviderError, RouteLeg};
use crate::core::types::PlaceSuggestion;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Google Maps web service client
///
/// One GET per lookup. The API key travels as a query parameter, so request
/// URLs are never logged.
#[derive(Debug, Clone)]
pub struct GoogleMapsProvider {
    client: Client,
    config: ProviderConfig,
    directions_url: String,
    distance_matrix_url: String,
    autocomplete_url: String,
}

impl GoogleMapsProvider {
    /// Create a provider using the configured endpoint URLs
    pub fn new(config: &EstimatorConfig) -> crate::utils::error::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.provider.timeout))
            .build()?;

        let url_for = |key: EndpointKey| {
            config
                .endpoints
                .get(&key)
                .map(|endpoint| endpoint.url.clone())
                .unwrap_or_else(|| EndpointConfig::builtin(key).url)
        };

        Ok(Self {
            client,
            config: config.provider.clone(),
            directions_url: url_for(EndpointKey::Directions),
            distance_matrix_url: url_for(EndpointKey::DistanceMatrix),
            autocomplete_url: url_for(EndpointKey::Autocomplete),
        })
    }

    fn api_key(&self) -> Result<&str, ProviderError> {
        self.config.api_key().ok_or(ProviderError::MissingCredentials)
    }

    fn route_params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("mode", "driving".to_string()),
            ("region", self.config.region.clone()),
        ];
        if self.config.departure_time_now {
            params.push(("departure_time", "now".to_string()));
        }
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        params.push(("key", api_key.to_string()));
        params
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(provider = "google", status = status.as_u16(), "HTTP error from provider");
            return Err(ProviderError::from_http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                ProviderError::MalformedResponse(e.to_string())
            } else {
                transport_error(e)
            }
        })
    }
}

fn transport_error(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(e.to_string())
    } else {
        ProviderError::Network(e.to_string())
    }
}

#[async_trait]
impl MapsProvider for GoogleMapsProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn has_credentials(&self) -> bool {
        self.config.api_key().is_some()
    }

    async fn directions(&self, origin: &str, destination: &str) -> Result<RouteLeg, ProviderError> {
        let api_key = self.api_key()?;
        let mut params = vec![
            ("origin", origin.to_string()),
            ("destination", destination.to_string()),
        ];
        params.extend(self.route_params(api_key));

        debug!(provider = "google", "Requesting directions: {} -> {}", origin, destination);
        let response: DirectionsResponse = self.get_json(&self.directions_url, &params).await?;
        response.into_leg()
    }

    async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteLeg, ProviderError> {
        let api_key = self.api_key()?;
        let mut params = vec![
            ("origins", origin.to_string()),
            ("destinations", destination.to_string()),
        ];
        params.extend(self.route_params(api_key));

        debug!(provider = "google", "Requesting distance matrix: {} -> {}", origin, destination);
        let response: DistanceMatrixResponse =
            self.get_json(&self.distance_matrix_url, &params).await?;
        response.into_leg()
    }

    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceSuggestion>, ProviderError> {
        let api_key = self.api_key()?;
        let mut params = vec![
            ("input", query.to_string()),
            (
                "location",
                format!("{},{}", self.config.bias_lat, self.config.bias_lng),
            ),
            ("radius", self.config.bias_radius_m.to_string()),
            ("components", format!("country:{}", self.config.region)),
        ];
        if let Some(language) = &self.config.language {
            params.push(("language", language.clone()));
        }
        params.push(("key", api_key.to_string()));

        debug!(provider = "google", "Requesting place suggestions for {:?}", query);
        let response: AutocompleteResponse = self.get_json(&self.autocomplete_url, &params).await?;
        response.into_suggestions()
    }
}
