//! Traffic level derivation
//!
//! Pricing consumers rely on this three-bucket contract: the ratio of the
//! traffic-adjusted duration to the free-flow duration is `Low` below 1.1,
//! `High` above 1.3 and `Medium` in between, both bounds inclusive.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Congestion bucket for a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrafficLevel {
    Low,
    Medium,
    High,
}

impl TrafficLevel {
    /// Classify a traffic/free-flow duration ratio
    pub fn from_ratio(ratio: f64) -> Self {
        if ratio < 1.1 {
            TrafficLevel::Low
        } else if ratio > 1.3 {
            TrafficLevel::High
        } else {
            TrafficLevel::Medium
        }
    }

    /// Classify from the two durations; a zero base duration has no meaningful ratio
    pub fn from_durations(base: f64, in_traffic: f64) -> Option<Self> {
        if base > 0.0 && base.is_finite() && in_traffic.is_finite() {
            Some(Self::from_ratio(in_traffic / base))
        } else {
            None
        }
    }
}

impl fmt::Display for TrafficLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TrafficLevel::Low => "Low",
            TrafficLevel::Medium => "Medium",
            TrafficLevel::High => "High",
        })
    }
}
