//! Autocomplete behaviour

use super::*;
use serde::{Deserialize, Serialize};

/// Location suggestion settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutocompleteConfig {
    /// Queries shorter than this never reach the provider
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Allow provider lookups at all; when off only the local directory answers
    #[serde(default = "default_true")]
    pub enable_api: bool,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            max_results: default_max_results(),
            enable_api: true,
        }
    }
}
