//! Mapping provider abstraction
//!
//! The orchestrator talks to the outside world only through [`MapsProvider`],
//! so tests can substitute a scripted provider for the HTTP one.

pub mod error;
pub mod google;
pub mod types;

pub use error::ProviderError;
pub use google::GoogleMapsProvider;
pub use types::RouteLeg;

use crate::config::EndpointKey;
use crate::core::types::PlaceSuggestion;
use async_trait::async_trait;
use std::fmt::Debug;

/// A source of route and place data
#[async_trait]
pub trait MapsProvider: Send + Sync + Debug + 'static {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Whether calls can be authenticated
    fn has_credentials(&self) -> bool;

    /// Driving route between two places
    async fn directions(&self, origin: &str, destination: &str) -> Result<RouteLeg, ProviderError>;

    /// Single-element distance matrix lookup between two places
    async fn distance_matrix(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<RouteLeg, ProviderError>;

    /// Place suggestions for free text; no matches is an empty list
    async fn autocomplete(&self, query: &str) -> Result<Vec<PlaceSuggestion>, ProviderError>;

    /// Dispatch a route lookup to the call backing `endpoint`
    async fn route(
        &self,
        endpoint: EndpointKey,
        origin: &str,
        destination: &str,
    ) -> Result<RouteLeg, ProviderError> {
        match endpoint {
            EndpointKey::DistanceMatrix => self.distance_matrix(origin, destination).await,
            _ => self.directions(origin, destination).await,
        }
    }
}
