//! Rate Limiting Implementation
//!
//! Per-endpoint admission control: minimum spacing, sliding minute and hour
//! windows, per-day counts, global daily/monthly quotas and exponential
//! backoff after retryable failures. Counters roll over lazily when read.

mod limiter;
mod types;


// Re-export public types
pub use limiter::RateLimiter;
pub use types::{Admission, EndpointStatus, QuotaInfo, QuotaWindowInfo, RecordedError};
