//! Error types for the fare estimator

#![allow(missing_docs)]

use crate::core::providers::ProviderError;
use thiserror::Error;

/// Result type alias for the fare estimator
pub type Result<T> = std::result::Result<T, FareError>;

/// Main error type for the fare estimator
#[derive(Error, Debug)]
pub enum FareError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Provider errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

impl FareError {
    /// Whether the error came from configuration rather than runtime input
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::Yaml(_))
    }
}
