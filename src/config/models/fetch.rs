//! Fetch orchestration settings

use super::*;
use serde::{Deserialize, Serialize};

/// Settings for the cache → limiter → provider sequence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FetchConfig {
    /// Extra wait added after a backoff window before the deferred retry fires
    #[serde(default = "default_retry_grace_ms")]
    pub retry_grace_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            retry_grace_ms: default_retry_grace_ms(),
        }
    }
}
