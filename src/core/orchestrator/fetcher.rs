//! Fetch orchestrator implementation

use super::retry::{RetryScheduler, RetrySlot};
use super::types::{
    FetchEvent, FetchStatus, InputError, RequestKey, RouteRequest, estimate_from_leg,
};
use crate::config::{AutocompleteConfig, EndpointKey, FetchConfig};
use crate::core::cache::ResponseCache;
use crate::core::clock::Clock;
use crate::core::locations;
use crate::core::providers::{MapsProvider, ProviderError};
use crate::core::rate_limiter::{Admission, RateLimiter};
use crate::core::types::{DataSource, PlaceSuggestion, RouteEstimate, merge_suggestions};
use futures::FutureExt;
use futures::future::BoxFuture;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Drives every outbound lookup through cache, limiter and provider
///
/// Cache and limiter are shared with other orchestrators. Outcomes are
/// returned to the caller and also broadcast, which is the only way to
/// observe the result of a deferred retry.
pub struct FetchOrchestrator {
    provider: Arc<dyn MapsProvider>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    clock: Arc<dyn Clock>,
    fetch: FetchConfig,
    autocomplete: AutocompleteConfig,
    in_flight: Mutex<HashSet<RequestKey>>,
    last_completed: Mutex<HashMap<EndpointKey, RouteRequest>>,
    last_query: Mutex<Option<String>>,
    retries: RetryScheduler,
    events: broadcast::Sender<FetchEvent>,
    credentials_reported: AtomicBool,
}

/// Removes an in-flight marker when the call finishes, however it finishes
struct InFlightGuard<'a> {
    set: &'a Mutex<HashSet<RequestKey>>,
    key: RequestKey,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(set: &'a Mutex<HashSet<RequestKey>>, key: RequestKey) -> Option<Self> {
        if set.lock().insert(key.clone()) {
            Some(Self { set, key })
        } else {
            None
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.set.lock().remove(&self.key);
    }
}

enum Trigger {
    Caller,
    Retry,
}

impl FetchOrchestrator {
    /// Create an orchestrator over shared cache and limiter instances
    pub fn new(
        provider: Arc<dyn MapsProvider>,
        cache: Arc<ResponseCache>,
        limiter: Arc<RateLimiter>,
        clock: Arc<dyn Clock>,
        fetch: FetchConfig,
        autocomplete: AutocompleteConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            provider,
            cache,
            limiter,
            clock,
            fetch,
            autocomplete,
            in_flight: Mutex::new(HashSet::new()),
            last_completed: Mutex::new(HashMap::new()),
            last_query: Mutex::new(None),
            retries: RetryScheduler::default(),
            events,
            credentials_reported: AtomicBool::new(false),
        }
    }

    /// Subscribe to every outcome, including those of deferred retries
    pub fn subscribe(&self) -> broadcast::Receiver<FetchEvent> {
        self.events.subscribe()
    }

    /// Number of deferred retries currently waiting
    pub fn pending_retries(&self) -> usize {
        self.retries.pending_count()
    }

    /// Abort every deferred retry
    pub fn cancel_retries(&self) {
        self.retries.cancel_all();
    }

    /// Abort retries and forget every completed request
    pub fn reset(&self) {
        self.retries.cancel_all();
        self.last_completed.lock().clear();
        *self.last_query.lock() = None;
    }

    /// Forget a route so the next identical request goes back to the provider
    pub fn invalidate(&self, endpoint: EndpointKey, origin: &str, destination: &str) -> bool {
        let origin = origin.trim();
        let destination = destination.trim();

        let mut last = self.last_completed.lock();
        if last
            .get(&endpoint)
            .is_some_and(|r| r.origin == origin && r.destination == destination)
        {
            last.remove(&endpoint);
        }
        drop(last);

        self.cache.clear_entry(endpoint, origin, destination)
    }

    /// Look up distance and duration between two places
    pub async fn fetch_route(
        self: &Arc<Self>,
        endpoint: EndpointKey,
        origin: &str,
        destination: &str,
    ) -> FetchStatus<RouteEstimate> {
        let request = match RouteRequest::new(endpoint, origin, destination) {
            Ok(request) => request,
            Err(reason) => {
                debug!("Rejected route request: {}", reason);
                return FetchStatus::InvalidInput { reason };
            }
        };

        self.retries.supersede(
            RetrySlot::Route(endpoint),
            &RequestKey::Route(request.clone()),
        );
        self.run_route(request, Trigger::Caller).await
    }

    /// Suggest places for free text, local directory first
    pub async fn suggest(self: &Arc<Self>, query: &str) -> FetchStatus<Vec<PlaceSuggestion>> {
        let query = query.trim();
        if query.chars().count() < self.autocomplete.min_query_chars {
            return FetchStatus::InvalidInput {
                reason: InputError::QueryTooShort {
                    min_chars: self.autocomplete.min_query_chars,
                },
            };
        }

        self.retries.supersede(
            RetrySlot::Suggest,
            &RequestKey::Suggest(query.to_lowercase()),
        );
        self.run_suggest(query.to_string(), Trigger::Caller).await
    }

    fn retry_route(self: Arc<Self>, request: RouteRequest, generation: u64) -> BoxFuture<'static, ()> {
        async move {
            if !self.retries.claim(RetrySlot::Route(request.endpoint), generation) {
                return;
            }
            info!("Retrying {} after backoff", request);
            self.run_route(request, Trigger::Retry).await;
        }
        .boxed()
    }

    fn retry_suggest(self: Arc<Self>, query: String, generation: u64) -> BoxFuture<'static, ()> {
        async move {
            if !self.retries.claim(RetrySlot::Suggest, generation) {
                return;
            }
            info!("Retrying suggestions for {:?} after backoff", query);
            self.run_suggest(query, Trigger::Retry).await;
        }
        .boxed()
    }

    async fn run_route(
        self: &Arc<Self>,
        request: RouteRequest,
        trigger: Trigger,
    ) -> FetchStatus<RouteEstimate> {
        let status = self.route_sequence(&request, trigger).await;
        let _ = self.events.send(FetchEvent::Route {
            request,
            status: status.clone(),
        });
        status
    }

    async fn route_sequence(
        self: &Arc<Self>,
        request: &RouteRequest,
        trigger: Trigger,
    ) -> FetchStatus<RouteEstimate> {
        let endpoint = request.endpoint;
        let slot = RetrySlot::Route(endpoint);

        if matches!(trigger, Trigger::Caller)
            && self.last_completed.lock().get(&endpoint) == Some(request)
        {
            debug!("Same route as last request, skipping: {}", request);
            return FetchStatus::Unchanged;
        }

        if let Some(cached) = self.cache.get(endpoint, &request.origin, &request.destination) {
            self.complete_route(request, slot);
            return FetchStatus::Ready {
                value: (*cached).clone(),
                source: DataSource::Cache,
            };
        }

        if !self.check_credentials() {
            return FetchStatus::MissingCredentials;
        }

        if let Some(denied) = self.admit(endpoint, slot, RequestKey::Route(request.clone()), {
            let this = Arc::clone(self);
            let request = request.clone();
            move |generation| this.retry_route(request, generation)
        }) {
            return denied;
        }

        let Some(_guard) =
            InFlightGuard::acquire(&self.in_flight, RequestKey::Route(request.clone()))
        else {
            debug!("Request already in flight: {}", request);
            return FetchStatus::InFlight;
        };

        info!("Requesting {} from {}", request, self.provider.name());
        let result = self
            .provider
            .route(endpoint, &request.origin, &request.destination)
            .await
            .and_then(estimate_from_leg);

        match result {
            Ok(estimate) => {
                self.cache.set(
                    endpoint,
                    &request.origin,
                    &request.destination,
                    estimate.clone(),
                );
                self.limiter.record_success(endpoint);
                self.complete_route(request, slot);
                info!(
                    "Route fetched: {} ({:.1} km, {:.0} min, {} traffic)",
                    request, estimate.distance_km, estimate.duration_min, estimate.traffic_level
                );
                FetchStatus::Ready {
                    value: estimate,
                    source: DataSource::Network,
                }
            }
            Err(e) => self.handle_failure(endpoint, slot, RequestKey::Route(request.clone()), e, {
                let this = Arc::clone(self);
                let request = request.clone();
                move |generation| this.retry_route(request, generation)
            }),
        }
    }

    async fn run_suggest(
        self: &Arc<Self>,
        query: String,
        trigger: Trigger,
    ) -> FetchStatus<Vec<PlaceSuggestion>> {
        let status = self.suggest_sequence(&query, trigger).await;
        if status.is_ready() {
            *self.last_query.lock() = Some(query.clone());
        }
        let _ = self.events.send(FetchEvent::Suggestions {
            query,
            status: status.clone(),
        });
        status
    }

    async fn suggest_sequence(
        self: &Arc<Self>,
        query: &str,
        trigger: Trigger,
    ) -> FetchStatus<Vec<PlaceSuggestion>> {
        let endpoint = EndpointKey::Autocomplete;
        let slot = RetrySlot::Suggest;
        let max_results = self.autocomplete.max_results;

        if matches!(trigger, Trigger::Caller) && self.last_query.lock().as_deref() == Some(query) {
            return FetchStatus::Unchanged;
        }

        let local = locations::search(query, max_results);
        if local.len() >= max_results {
            debug!("Local directory answered {:?}", query);
            return FetchStatus::Ready {
                value: local,
                source: DataSource::Local,
            };
        }

        if let Some(cached) = self.cache.get_autocomplete(query) {
            self.retries.cancel(slot);
            return FetchStatus::Ready {
                value: merge_suggestions(&local, &cached, max_results),
                source: DataSource::Cache,
            };
        }

        if !self.autocomplete.enable_api || !self.check_credentials() {
            return FetchStatus::Ready {
                value: local,
                source: DataSource::Local,
            };
        }

        let key = RequestKey::Suggest(query.to_lowercase());
        if let Some(denied) = self.admit(endpoint, slot, key.clone(), {
            let this = Arc::clone(self);
            let query = query.to_string();
            move |generation| this.retry_suggest(query, generation)
        }) {
            return denied;
        }

        let Some(_guard) = InFlightGuard::acquire(&self.in_flight, key.clone()) else {
            return FetchStatus::InFlight;
        };

        match self.provider.autocomplete(query).await {
            Ok(mut remote) => {
                self.limiter.record_success(endpoint);
                self.retries.cancel(slot);
                remote.truncate(max_results);
                if !remote.is_empty() {
                    self.cache.set_autocomplete(query, remote.clone());
                }
                debug!("Provider returned {} suggestions for {:?}", remote.len(), query);
                FetchStatus::Ready {
                    value: merge_suggestions(&local, &remote, max_results),
                    source: DataSource::Network,
                }
            }
            Err(e) => self.handle_failure(endpoint, slot, key, e, {
                let this = Arc::clone(self);
                let query = query.to_string();
                move |generation| this.retry_suggest(query, generation)
            }),
        }
    }

    fn complete_route(&self, request: &RouteRequest, slot: RetrySlot) {
        self.last_completed
            .lock()
            .insert(request.endpoint, request.clone());
        self.retries.cancel(slot);
    }

    fn check_credentials(&self) -> bool {
        if self.provider.has_credentials() {
            return true;
        }
        if !self.credentials_reported.swap(true, Ordering::Relaxed) {
            warn!("API key not configured; provider lookups are disabled");
        }
        false
    }

    fn retry_delay(&self, until_ms: i64) -> Duration {
        let remaining = until_ms.saturating_sub(self.clock.now_ms()).max(0);
        let wait_ms = u64::try_from(remaining)
            .unwrap_or(0)
            .saturating_add(self.fetch.retry_grace_ms);
        Duration::from_millis(wait_ms)
    }

    /// Admission check; `Some` carries the status to surface when denied
    fn admit<T, F>(
        &self,
        endpoint: EndpointKey,
        slot: RetrySlot,
        key: RequestKey,
        retry: F,
    ) -> Option<FetchStatus<T>>
    where
        F: FnOnce(u64) -> BoxFuture<'static, ()>,
    {
        match self.limiter.check_admission(endpoint) {
            Admission::Allowed => None,
            Admission::BackedOff { until_ms } => {
                let delay = self.retry_delay(until_ms);
                self.retries.schedule(slot, key, delay, retry);
                let retry_after_secs = delay.as_millis().div_ceil(1000) as u64;
                info!("{} backed off, retrying in {}s", endpoint, retry_after_secs);
                Some(FetchStatus::RetryScheduled { retry_after_secs })
            }
            Admission::QuotaExceeded => {
                warn!("Quota exceeded for {}", endpoint);
                Some(FetchStatus::QuotaExceeded)
            }
            Admission::Throttled | Admission::Unconfigured => {
                debug!("{} throttled", endpoint);
                Some(FetchStatus::Throttled)
            }
        }
    }

    fn handle_failure<T, F>(
        &self,
        endpoint: EndpointKey,
        slot: RetrySlot,
        key: RequestKey,
        error: ProviderError,
        retry: F,
    ) -> FetchStatus<T>
    where
        F: FnOnce(u64) -> BoxFuture<'static, ()>,
    {
        let retry_scheduled = match error {
            // Nothing was sent, or the provider answered; neither counts against backoff
            ProviderError::MissingCredentials | ProviderError::MalformedResponse(_) => false,
            _ => {
                let retryable = self.limiter.record_error(endpoint, error.status_code());
                match self.limiter.backoff_until(endpoint).filter(|_| retryable) {
                    Some(until_ms) => {
                        self.retries
                            .schedule(slot, key, self.retry_delay(until_ms), retry);
                        true
                    }
                    None => false,
                }
            }
        };

        if retry_scheduled {
            warn!("{} failed ({}), retry scheduled", endpoint, error);
        } else {
            error!("{} failed: {}", endpoint, error);
        }
        FetchStatus::from_provider_error(&error, retry_scheduled)
    }
}

impl std::fmt::Debug for FetchOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchOrchestrator")
            .field("provider", &self.provider.name())
            .field("in_flight", &self.in_flight.lock().len())
            .field("retries", &self.retries)
            .finish()
    }
}
