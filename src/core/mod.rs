//! Core functionality for the estimator
//!
//! This module contains the rate limiter, response cache, fetch orchestration
//! and the mapping provider they guard.

pub mod cache;
pub mod clock;
pub mod locations;
pub mod orchestrator;
pub mod providers;
pub mod rate_limiter;
pub mod traffic;
pub mod types;

use crate::config::{Config, EndpointKey};
use crate::utils::error::Result;
use cache::{CacheStats, ResponseCache};
use clock::{Clock, SystemClock};
use orchestrator::{FetchOrchestrator, FetchStatus};
use providers::{GoogleMapsProvider, MapsProvider};
use rate_limiter::{EndpointStatus, QuotaInfo, RateLimiter};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use types::{PlaceSuggestion, RouteEstimate};

/// Point-in-time view of quota, limiter and cache state
#[derive(Debug, Clone, Serialize)]
pub struct EstimatorStatus {
    pub quota: QuotaInfo,
    pub endpoints: Vec<EndpointStatus>,
    pub cache: CacheStats,
}

/// Main Estimator struct that wires every shared component together
///
/// One cache and one limiter are created per estimator and handed to the
/// orchestrator by `Arc`; further orchestrators built with
/// [`Estimator::orchestrator_for`] share them.
#[derive(Clone)]
pub struct Estimator {
    /// Estimator configuration
    config: Arc<Config>,
    clock: Arc<dyn Clock>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    provider: Arc<dyn MapsProvider>,
    orchestrator: Arc<FetchOrchestrator>,
}

impl Estimator {
    /// Create an estimator backed by the Google Maps web services
    pub fn new(config: Config) -> Result<Self> {
        info!("Initializing estimator");

        debug!("Initializing mapping provider");
        let provider: Arc<dyn MapsProvider> =
            Arc::new(GoogleMapsProvider::new(&config.estimator)?);

        Ok(Self::with_provider(config, provider, Arc::new(SystemClock)))
    }

    /// Create an estimator around an existing provider and clock
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn MapsProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let config = Arc::new(config);

        debug!("Initializing response cache");
        let cache = Arc::new(ResponseCache::new(config.cache().clone(), clock.clone()));

        debug!("Initializing rate limiter");
        let limiter = Arc::new(RateLimiter::from_config(&config.estimator, clock.clone()));

        debug!("Initializing fetch orchestrator");
        let orchestrator = Arc::new(FetchOrchestrator::new(
            provider.clone(),
            cache.clone(),
            limiter.clone(),
            clock.clone(),
            config.estimator.fetch.clone(),
            config.autocomplete().clone(),
        ));

        if !provider.has_credentials() {
            info!("No API key configured; only cached and local data is available");
        }
        info!("Estimator initialized with provider {}", provider.name());

        Self {
            config,
            clock,
            cache,
            limiter,
            provider,
            orchestrator,
        }
    }

    /// A new orchestrator sharing this estimator's cache and limiter
    pub fn orchestrator_for(&self) -> Arc<FetchOrchestrator> {
        Arc::new(FetchOrchestrator::new(
            self.provider.clone(),
            self.cache.clone(),
            self.limiter.clone(),
            self.clock.clone(),
            self.config.estimator.fetch.clone(),
            self.config.autocomplete().clone(),
        ))
    }

    /// Look up a route through the default orchestrator
    pub async fn route(
        &self,
        endpoint: EndpointKey,
        origin: &str,
        destination: &str,
    ) -> FetchStatus<RouteEstimate> {
        self.orchestrator
            .fetch_route(endpoint, origin, destination)
            .await
    }

    /// Suggest places through the default orchestrator
    pub async fn suggest(&self, query: &str) -> FetchStatus<Vec<PlaceSuggestion>> {
        self.orchestrator.suggest(query).await
    }

    /// Current quota, per-endpoint and cache state
    pub fn status(&self) -> EstimatorStatus {
        EstimatorStatus {
            quota: self.limiter.quota_info(),
            endpoints: self.limiter.endpoint_status(),
            cache: self.cache.stats(),
        }
    }

    /// Get estimator configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the default orchestrator
    pub fn orchestrator(&self) -> &Arc<FetchOrchestrator> {
        &self.orchestrator
    }

    /// Get the shared response cache
    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /// Get the shared rate limiter
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Return limiter, cache and the default orchestrator to their initial state
    pub fn reset(&self) {
        self.orchestrator.reset();
        self.limiter.reset();
        self.cache.clear();
        self.cache.clear_autocomplete();
        info!("Estimator state reset");
    }

    /// Abort pending retries before the estimator is dropped
    pub fn shutdown(&self) {
        info!("Shutting down estimator");
        self.orchestrator.cancel_retries();
    }
}

impl std::fmt::Debug for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Estimator")
            .field("provider", &self.provider.name())
            .field("cache", &self.cache)
            .field("limiter", &self.limiter)
            .finish()
    }
}
