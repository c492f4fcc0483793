//! Fetch orchestration types

use crate::config::EndpointKey;
use crate::core::providers::{ProviderError, RouteLeg};
use crate::core::traffic::TrafficLevel;
use crate::core::types::{DataSource, PlaceSuggestion, RouteEstimate};
use serde::Serialize;
use std::fmt;

/// Reasons a request is rejected before any cache or network activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum InputError {
    /// Origin or destination is blank
    MissingLocation,
    /// Origin and destination are the same place
    SameLocation,
    /// The endpoint does not serve route lookups
    UnsupportedEndpoint(EndpointKey),
    /// Suggestion query below the minimum length
    QueryTooShort { min_chars: usize },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputError::MissingLocation => f.write_str("Origin and destination are required"),
            InputError::SameLocation => f.write_str("Origin and destination must be different"),
            InputError::UnsupportedEndpoint(key) => {
                write!(f, "Endpoint {} does not provide routes", key)
            }
            InputError::QueryTooShort { min_chars } => {
                write!(f, "Type at least {} characters to search", min_chars)
            }
        }
    }
}

/// Outcome of one pass through the cache → limiter → provider sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FetchStatus<T> {
    /// A result is available
    Ready { value: T, source: DataSource },
    /// Same request as the last completed one; nothing to do
    Unchanged,
    /// An identical request is already waiting on the provider
    InFlight,
    InvalidInput { reason: InputError },
    /// The endpoint is backing off; a deferred retry is scheduled
    RetryScheduled { retry_after_secs: u64 },
    /// A daily or monthly ceiling is reached; no retry is scheduled
    QuotaExceeded,
    /// Spacing or a request window is saturated; no retry is scheduled
    Throttled,
    /// The provider call failed
    Failed {
        code: u16,
        message: String,
        retry_scheduled: bool,
    },
    /// The provider reported success with unusable data
    MalformedResponse { detail: String },
    MissingCredentials,
}

impl<T> FetchStatus<T> {
    /// The result, if one is available
    pub fn value(&self) -> Option<&T> {
        match self {
            FetchStatus::Ready { value, .. } => Some(value),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchStatus::Ready { .. })
    }

    /// Message for the operator, `None` when there is nothing to report
    pub fn user_message(&self) -> Option<String> {
        match self {
            FetchStatus::Ready { .. } | FetchStatus::Unchanged => None,
            FetchStatus::InFlight => Some("Request already in progress".to_string()),
            FetchStatus::InvalidInput { reason } => Some(reason.to_string()),
            FetchStatus::RetryScheduled { retry_after_secs } => {
                Some(format!("Rate limited. Retry in {}s", retry_after_secs))
            }
            FetchStatus::QuotaExceeded => {
                Some("API quota reached. Using cached or default data.".to_string())
            }
            FetchStatus::Throttled => Some("Rate limit reached. Please wait...".to_string()),
            FetchStatus::Failed { message, .. } => Some(message.clone()),
            FetchStatus::MalformedResponse { .. } => Some("Invalid route data received".to_string()),
            FetchStatus::MissingCredentials => {
                Some("API key is invalid or not configured.".to_string())
            }
        }
    }

    pub(super) fn from_provider_error(error: &ProviderError, retry_scheduled: bool) -> Self {
        match error {
            ProviderError::MissingCredentials => FetchStatus::MissingCredentials,
            ProviderError::MalformedResponse(detail) => FetchStatus::MalformedResponse {
                detail: detail.clone(),
            },
            _ => FetchStatus::Failed {
                code: error.status_code(),
                message: error.user_message(),
                retry_scheduled,
            },
        }
    }
}

/// Identity of a route lookup, after trimming
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RouteRequest {
    pub endpoint: EndpointKey,
    pub origin: String,
    pub destination: String,
}

impl RouteRequest {
    /// Normalize and validate a route lookup
    pub fn new(endpoint: EndpointKey, origin: &str, destination: &str) -> Result<Self, InputError> {
        if !matches!(endpoint, EndpointKey::Directions | EndpointKey::DistanceMatrix) {
            return Err(InputError::UnsupportedEndpoint(endpoint));
        }

        let origin = origin.trim();
        let destination = destination.trim();
        if origin.is_empty() || destination.is_empty() {
            return Err(InputError::MissingLocation);
        }
        if origin == destination {
            return Err(InputError::SameLocation);
        }

        Ok(Self {
            endpoint,
            origin: origin.to_string(),
            destination: destination.to_string(),
        })
    }
}

impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} -> {}", self.endpoint, self.origin, self.destination)
    }
}

/// Identity used for in-flight de-duplication
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(super) enum RequestKey {
    Route(RouteRequest),
    /// Lowercased suggestion query
    Suggest(String),
}

/// Outcome broadcast to subscribers, including deferred retries
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchEvent {
    Route {
        request: RouteRequest,
        status: FetchStatus<RouteEstimate>,
    },
    Suggestions {
        query: String,
        status: FetchStatus<Vec<PlaceSuggestion>>,
    },
}

/// Convert provider figures into the estimate handed to pricing
///
/// A zero free-flow duration cannot be classified and is reported as a
/// malformed response.
pub fn estimate_from_leg(leg: RouteLeg) -> Result<RouteEstimate, ProviderError> {
    let base_min = leg.duration_seconds as f64 / 60.0;
    let traffic_min = leg.traffic_seconds() as f64 / 60.0;

    let traffic_level = TrafficLevel::from_durations(base_min, traffic_min)
        .ok_or_else(|| ProviderError::MalformedResponse("Invalid duration data".to_string()))?;

    Ok(RouteEstimate {
        distance_km: leg.distance_meters as f64 / 1000.0,
        duration_min: traffic_min,
        duration_base_min: base_min,
        traffic_level,
        summary: leg.summary,
    })
}
