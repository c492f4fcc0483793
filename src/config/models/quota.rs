//! Global quota configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Ceilings shared by every endpoint, matching the provider billing tier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuotaConfig {
    #[serde(default = "default_daily_requests")]
    pub daily_requests: u64,
    #[serde(default = "default_monthly_requests")]
    pub monthly_requests: u64,
    /// Usage percentage above which a warning is logged
    #[serde(default = "default_warning_threshold")]
    pub warning_threshold_percent: f64,
    /// Usage percentage above which usage is reported as critical
    #[serde(default = "default_critical_threshold")]
    pub critical_threshold_percent: f64,
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            daily_requests: default_daily_requests(),
            monthly_requests: default_monthly_requests(),
            warning_threshold_percent: default_warning_threshold(),
            critical_threshold_percent: default_critical_threshold(),
        }
    }
}
