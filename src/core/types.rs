//! Shared result types handed from the lookup layer to pricing consumers

use crate::core::traffic::TrafficLevel;
use serde::{Deserialize, Serialize};

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Built-in location directory
    Local,
    /// Response cache
    Cache,
    /// Live provider call
    Network,
}

/// Route figures consumed by the fare calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub distance_km: f64,
    /// Traffic-adjusted duration in minutes
    pub duration_min: f64,
    /// Free-flow duration in minutes
    pub duration_base_min: f64,
    pub traffic_level: TrafficLevel,
    /// Provider's one-line route description, if any
    pub summary: Option<String>,
}

/// A location suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceSuggestion {
    /// Short name shown first in a suggestion list
    pub name: String,
    pub full_address: String,
    /// Provider place id, absent for local entries
    pub place_id: Option<String>,
    /// Category such as `area`, `transport` or `google`
    pub kind: String,
}

/// Merge local and provider suggestions, local first, dropping names seen before
pub fn merge_suggestions(
    local: &[PlaceSuggestion],
    remote: &[PlaceSuggestion],
    max_results: usize,
) -> Vec<PlaceSuggestion> {
    let mut seen = std::collections::HashSet::new();
    local
        .iter()
        .chain(remote.iter())
        .filter(|s| seen.insert(s.name.to_lowercase()))
        .take(max_results)
        .cloned()
        .collect()
}
