//! Provider response types

use serde::{Deserialize, Serialize};

/// Figures extracted from one route leg or matrix element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
    pub distance_meters: u64,
    /// Free-flow duration
    pub duration_seconds: u64,
    /// Traffic-adjusted duration, when the provider reports one
    pub duration_in_traffic_seconds: Option<u64>,
    pub summary: Option<String>,
}

impl RouteLeg {
    /// Traffic-adjusted duration, falling back to the free-flow duration
    pub fn traffic_seconds(&self) -> u64 {
        self.duration_in_traffic_seconds
            .unwrap_or(self.duration_seconds)
    }
}
