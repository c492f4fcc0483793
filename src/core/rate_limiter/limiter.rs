//! Core rate limiter implementation

use super::types::{
    Admission, EndpointState, EndpointStatus, GlobalQuota, LimiterState, QuotaInfo,
    QuotaWindowInfo, RecordedError,
};
use crate::config::{EndpointConfig, EndpointKey, EstimatorConfig, QuotaConfig};
use crate::core::clock::Clock;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Per-endpoint admission control shared by every orchestrator
///
/// All counter mutations go through this type. State sits behind a single
/// mutex, so concurrent callers on different endpoints never observe each
/// other's windows half-updated, and the global quota stays consistent.
pub struct RateLimiter {
    endpoints: HashMap<EndpointKey, EndpointConfig>,
    quota: QuotaConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<LimiterState>,
}

impl RateLimiter {
    /// Create a rate limiter with state for every configured endpoint
    pub fn new(
        endpoints: HashMap<EndpointKey, EndpointConfig>,
        quota: QuotaConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let now = clock.now_ms();
        let state = LimiterState {
            endpoints: endpoints
                .iter()
                .map(|(key, config)| (*key, EndpointState::new(config)))
                .collect(),
            quota: GlobalQuota::new(now),
        };

        Self {
            endpoints,
            quota,
            clock,
            state: Mutex::new(state),
        }
    }

    /// Create a rate limiter from estimator configuration
    pub fn from_config(config: &EstimatorConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(config.endpoints.clone(), config.quota.clone(), clock)
    }

    /// Whether a call to `key` may be made now
    pub fn can_make_request(&self, key: EndpointKey) -> bool {
        self.check_admission(key).is_allowed()
    }

    /// Evaluate admission for `key`, reporting why a call is refused
    ///
    /// Only prunes sliding windows, clears an elapsed backoff and rolls
    /// quota counters over; it records nothing, so it may be polled freely.
    pub fn check_admission(&self, key: EndpointKey) -> Admission {
        let Some(config) = self.endpoints.get(&key) else {
            warn!("Admission check for unconfigured endpoint: {}", key);
            return Admission::Unconfigured;
        };

        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state.roll_over(now);

        let LimiterState { endpoints, quota } = &mut *state;
        match endpoints.get_mut(&key) {
            Some(endpoint) => admit(key, config, endpoint, quota, &self.quota, now),
            None => Admission::Unconfigured,
        }
    }

    /// Forget all endpoint history and global usage
    pub fn reset(&self) {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        for (key, endpoint) in state.endpoints.iter_mut() {
            if let Some(config) = self.endpoints.get(key) {
                *endpoint = EndpointState::new(config);
            }
        }
        state.quota = GlobalQuota::new(now);
        info!("Rate limiter state reset");
    }

    /// Record a successful network call
    pub fn record_success(&self, key: EndpointKey) {
        let Some(config) = self.endpoints.get(&key) else {
            warn!("Success recorded for unconfigured endpoint: {}", key);
            return;
        };

        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state.roll_over(now);

        let before = quota_info(&state.quota, &self.quota);
        if let Some(endpoint) = state.endpoints.get_mut(&key) {
            endpoint.minute_window.push_back(now);
            endpoint.hour_window.push_back(now);
            endpoint.per_day_count += 1;
            endpoint.last_request_ms = Some(now);
            endpoint.retry_count = 0;
            endpoint.current_delay_ms = config.backoff.initial_delay_ms;
        }
        state.quota.daily_count += 1;
        state.quota.monthly_count += 1;

        let after = quota_info(&state.quota, &self.quota);
        debug!(
            "Recorded success for {} (daily {}/{}, monthly {}/{})",
            key, after.daily.used, after.daily.limit, after.monthly.used, after.monthly.limit
        );
        report_thresholds(&before, &after);
    }

    /// Record a failed network call; returns whether a retry should be scheduled
    pub fn record_error(&self, key: EndpointKey, status_code: u16) -> bool {
        let Some(config) = self.endpoints.get(&key) else {
            warn!("Error recorded for unconfigured endpoint: {}", key);
            return false;
        };

        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        let Some(endpoint) = state.endpoints.get_mut(&key) else {
            return false;
        };

        endpoint.remember_error(RecordedError {
            timestamp_ms: now,
            status_code,
        });

        if !config.is_retryable(status_code) {
            debug!("Status {} on {} is not retryable", status_code, key);
            return false;
        }

        endpoint.retry_count += 1;
        if endpoint.retry_count > config.max_retries {
            warn!(
                "Retries exhausted for {} after {} attempts",
                key, config.max_retries
            );
            return false;
        }

        if !config.backoff.enabled {
            return false;
        }

        let delay = endpoint.current_delay_ms.min(config.backoff.max_delay_ms);
        endpoint.is_backed_off = true;
        endpoint.backoff_until_ms = now.saturating_add(i64::try_from(delay).unwrap_or(i64::MAX));
        endpoint.current_delay_ms = next_delay(
            endpoint.current_delay_ms,
            config.backoff.multiplier,
            config.backoff.max_delay_ms,
        );

        info!(
            "Backing off {} for {}ms (retry {}/{}, status {})",
            key, delay, endpoint.retry_count, config.max_retries, status_code
        );
        true
    }

    /// End of the active backoff for `key`, if one is in force
    pub fn backoff_until(&self, key: EndpointKey) -> Option<i64> {
        let now = self.clock.now_ms();
        let state = self.state.lock();
        state
            .endpoints
            .get(&key)
            .filter(|endpoint| endpoint.is_backed_off && now < endpoint.backoff_until_ms)
            .map(|endpoint| endpoint.backoff_until_ms)
    }

    /// Global quota usage, after rolling counters over elapsed boundaries
    pub fn quota_info(&self) -> QuotaInfo {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state.roll_over(now);
        quota_info(&state.quota, &self.quota)
    }

    /// Diagnostic snapshot of every configured endpoint
    pub fn endpoint_status(&self) -> Vec<EndpointStatus> {
        let now = self.clock.now_ms();
        let mut state = self.state.lock();
        state.roll_over(now);

        let mut keys: Vec<EndpointKey> = self.endpoints.keys().copied().collect();
        keys.sort();

        let LimiterState { endpoints, quota } = &mut *state;
        keys.into_iter()
            .filter_map(|key| {
                let config = self.endpoints.get(&key)?;
                let endpoint = endpoints.get_mut(&key)?;
                let admission = admit(key, config, endpoint, quota, &self.quota, now);
                endpoint.prune(now);

                Some(EndpointStatus {
                    key,
                    name: config.name.clone(),
                    can_make_request: admission.is_allowed(),
                    is_backed_off: endpoint.is_backed_off,
                    backoff_remaining_ms: endpoint.backoff_until_ms.saturating_sub(now),
                    requests_last_minute: endpoint.minute_window.len(),
                    requests_last_hour: endpoint.hour_window.len(),
                    requests_today: endpoint.per_day_count,
                    recent_errors: endpoint.recent_errors.iter().copied().collect(),
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("endpoints", &self.endpoints.len())
            .field("quota", &self.quota)
            .finish()
    }
}

/// Ordered admission rules for one endpoint
fn admit(
    key: EndpointKey,
    config: &EndpointConfig,
    endpoint: &mut EndpointState,
    quota: &GlobalQuota,
    limits: &QuotaConfig,
    now: i64,
) -> Admission {
    if endpoint.is_backed_off {
        if now < endpoint.backoff_until_ms {
            return Admission::BackedOff {
                until_ms: endpoint.backoff_until_ms,
            };
        }
        endpoint.is_backed_off = false;
        debug!("Backoff elapsed for {}", key);
    }

    if let Some(last) = endpoint.last_request_ms {
        let min_interval = i64::try_from(config.min_interval_ms).unwrap_or(i64::MAX);
        if now.saturating_sub(last) < min_interval {
            return Admission::Throttled;
        }
    }

    endpoint.prune(now);

    if endpoint.minute_window.len() >= config.requests_per_minute as usize {
        debug!(
            "Rate limit exceeded for {}: {}/{} requests per minute",
            key,
            endpoint.minute_window.len(),
            config.requests_per_minute
        );
        return Admission::Throttled;
    }

    if endpoint.hour_window.len() >= config.requests_per_hour as usize {
        debug!(
            "Rate limit exceeded for {}: {}/{} requests per hour",
            key,
            endpoint.hour_window.len(),
            config.requests_per_hour
        );
        return Admission::Throttled;
    }

    if endpoint.per_day_count >= config.requests_per_day {
        debug!("Daily limit reached for {}", key);
        return Admission::QuotaExceeded;
    }

    if quota.daily_count >= limits.daily_requests {
        debug!("Global daily quota reached");
        return Admission::QuotaExceeded;
    }

    if quota.monthly_count >= limits.monthly_requests {
        debug!("Global monthly quota reached");
        return Admission::QuotaExceeded;
    }

    Admission::Allowed
}

fn next_delay(current_ms: u64, multiplier: f64, max_ms: u64) -> u64 {
    let grown = (current_ms as f64 * multiplier).round();
    if grown >= max_ms as f64 {
        max_ms
    } else {
        grown as u64
    }
}

fn window_info(used: u64, limit: u64, limits: &QuotaConfig) -> QuotaWindowInfo {
    let percent_used = if limit == 0 {
        0.0
    } else {
        used as f64 / limit as f64 * 100.0
    };

    QuotaWindowInfo {
        used,
        limit,
        percent_used,
        warning: percent_used > limits.warning_threshold_percent,
        critical: percent_used > limits.critical_threshold_percent,
    }
}

fn quota_info(quota: &GlobalQuota, limits: &QuotaConfig) -> QuotaInfo {
    QuotaInfo {
        daily: window_info(quota.daily_count, limits.daily_requests, limits),
        monthly: window_info(quota.monthly_count, limits.monthly_requests, limits),
    }
}

/// Log once when a window crosses a usage threshold
fn report_thresholds(before: &QuotaInfo, after: &QuotaInfo) {
    for (label, old, new) in [
        ("daily", &before.daily, &after.daily),
        ("monthly", &before.monthly, &after.monthly),
    ] {
        if new.critical && !old.critical {
            error!(
                "Critical: {} quota at {:.1}% ({}/{})",
                label, new.percent_used, new.used, new.limit
            );
        } else if new.warning && !old.warning {
            warn!(
                "Warning: {} quota at {:.1}% ({}/{})",
                label, new.percent_used, new.used, new.limit
            );
        }
    }
}
