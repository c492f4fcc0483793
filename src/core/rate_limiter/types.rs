//! Rate limiter types and data structures

use crate::config::{EndpointConfig, EndpointKey};
use crate::core::clock;
use serde::Serialize;
use std::collections::{HashMap, VecDeque};

/// Number of recent errors kept per endpoint
pub(super) const RECENT_ERROR_LIMIT: usize = 5;

pub(super) const MINUTE_MS: i64 = 60 * 1000;
pub(super) const HOUR_MS: i64 = 60 * MINUTE_MS;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// A call may be made now
    Allowed,
    /// The endpoint is backing off after a retryable failure
    BackedOff {
        /// Instant the backoff ends, in epoch milliseconds
        until_ms: i64,
    },
    /// Minimum spacing or a sliding window is saturated
    Throttled,
    /// A per-day, daily or monthly ceiling is reached
    QuotaExceeded,
    /// The endpoint has no configuration
    Unconfigured,
}

impl Admission {
    /// Whether a call may be made
    pub fn is_allowed(&self) -> bool {
        matches!(self, Admission::Allowed)
    }
}

/// A failed call remembered for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordedError {
    pub timestamp_ms: i64,
    pub status_code: u16,
}

/// Usage of one global quota window
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaWindowInfo {
    pub used: u64,
    pub limit: u64,
    pub percent_used: f64,
    /// Usage is above the warning threshold
    pub warning: bool,
    /// Usage is above the critical threshold
    pub critical: bool,
}

/// Snapshot of global quota usage
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuotaInfo {
    pub daily: QuotaWindowInfo,
    pub monthly: QuotaWindowInfo,
}

/// Diagnostic snapshot of one endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointStatus {
    pub key: EndpointKey,
    pub name: String,
    pub can_make_request: bool,
    pub is_backed_off: bool,
    /// Milliseconds until the backoff ends; negative once it has passed
    pub backoff_remaining_ms: i64,
    pub requests_last_minute: usize,
    pub requests_last_hour: usize,
    pub requests_today: u32,
    pub recent_errors: Vec<RecordedError>,
}

/// Mutable admission state for one endpoint
#[derive(Debug, Clone)]
pub(super) struct EndpointState {
    pub(super) last_request_ms: Option<i64>,
    pub(super) minute_window: VecDeque<i64>,
    pub(super) hour_window: VecDeque<i64>,
    pub(super) per_day_count: u32,
    pub(super) is_backed_off: bool,
    pub(super) backoff_until_ms: i64,
    pub(super) retry_count: u32,
    /// Delay handed out on the next retryable failure
    pub(super) current_delay_ms: u64,
    pub(super) recent_errors: VecDeque<RecordedError>,
}

impl EndpointState {
    pub(super) fn new(config: &EndpointConfig) -> Self {
        Self {
            last_request_ms: None,
            minute_window: VecDeque::new(),
            hour_window: VecDeque::new(),
            per_day_count: 0,
            is_backed_off: false,
            backoff_until_ms: 0,
            retry_count: 0,
            current_delay_ms: config.backoff.initial_delay_ms,
            recent_errors: VecDeque::with_capacity(RECENT_ERROR_LIMIT),
        }
    }

    /// Drop window timestamps that are no longer newer than their window start
    pub(super) fn prune(&mut self, now_ms: i64) {
        prune_window(&mut self.minute_window, now_ms - MINUTE_MS);
        prune_window(&mut self.hour_window, now_ms - HOUR_MS);
    }

    pub(super) fn remember_error(&mut self, error: RecordedError) {
        self.recent_errors.push_back(error);
        while self.recent_errors.len() > RECENT_ERROR_LIMIT {
            self.recent_errors.pop_front();
        }
    }
}

fn prune_window(window: &mut VecDeque<i64>, window_start: i64) {
    while window.front().is_some_and(|&t| t <= window_start) {
        window.pop_front();
    }
}

/// Request counters shared by every endpoint
#[derive(Debug, Clone)]
pub(super) struct GlobalQuota {
    pub(super) daily_count: u64,
    pub(super) daily_reset_at_ms: i64,
    pub(super) monthly_count: u64,
    pub(super) monthly_reset_at_ms: i64,
}

impl GlobalQuota {
    pub(super) fn new(now_ms: i64) -> Self {
        Self {
            daily_count: 0,
            daily_reset_at_ms: clock::next_midnight(now_ms),
            monthly_count: 0,
            monthly_reset_at_ms: clock::next_month_start(now_ms),
        }
    }
}

/// Everything the limiter mutates, kept behind one lock
#[derive(Debug)]
pub(super) struct LimiterState {
    pub(super) endpoints: HashMap<EndpointKey, EndpointState>,
    pub(super) quota: GlobalQuota,
}

impl LimiterState {
    /// Roll counters over any day or month boundary that has passed
    pub(super) fn roll_over(&mut self, now_ms: i64) {
        if now_ms >= self.quota.daily_reset_at_ms {
            self.quota.daily_count = 0;
            self.quota.daily_reset_at_ms = clock::next_midnight(now_ms);
            for endpoint in self.endpoints.values_mut() {
                endpoint.per_day_count = 0;
            }
            tracing::info!("Daily quota counters reset");
        }

        if now_ms >= self.quota.monthly_reset_at_ms {
            self.quota.monthly_count = 0;
            self.quota.monthly_reset_at_ms = clock::next_month_start(now_ms);
            tracing::info!("Monthly quota counters reset");
        }
    }
}
