//! Mapping provider error types

use thiserror::Error;

/// Failures reported by a mapping provider call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// No API key is configured, so no call was attempted
    #[error("Mapping provider API key is not configured")]
    MissingCredentials,

    /// Transport-level failure before a response arrived
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete in time
    #[error("Request timeout: {0}")]
    Timeout(String),

    /// The provider answered with a non-success status
    #[error("Provider error {status} ({code}): {message}")]
    Status {
        /// Numeric code used for retry decisions
        code: u16,
        /// Provider status string, e.g. `OVER_QUERY_LIMIT`
        status: String,
        message: String,
    },

    /// A success response that could not be used
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ProviderError {
    /// Build an error from a provider status string
    pub fn from_status(status: &str, message: Option<String>) -> Self {
        Self::Status {
            code: status_code_for(status),
            status: status.to_string(),
            message: message.unwrap_or_else(|| status.to_string()),
        }
    }

    /// Build an error from a non-2xx HTTP response
    pub fn from_http(code: u16, reason: &str) -> Self {
        Self::Status {
            code,
            status: format!("HTTP_{}", code),
            message: format!("HTTP {}: {}", code, reason),
        }
    }

    /// Numeric status understood by the rate limiter's retry policy
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingCredentials => 401,
            Self::Network(_) => 503,
            Self::Timeout(_) => 408,
            Self::Status { code, .. } => *code,
            Self::MalformedResponse(_) => 502,
        }
    }

    /// Error category for logs and JSON output
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "missing_credentials",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
            Self::Status { .. } => "provider_status",
            Self::MalformedResponse(_) => "malformed_response",
        }
    }

    /// Message suitable for showing to an operator
    pub fn user_message(&self) -> String {
        match self {
            Self::MissingCredentials => "API key is invalid or not configured.".to_string(),
            Self::Network(_) => "Network error. Using cached data if available.".to_string(),
            Self::Timeout(_) => "Request timed out. Please retry.".to_string(),
            Self::MalformedResponse(_) => "Invalid route data received".to_string(),
            Self::Status { code, status, .. } => match status.as_str() {
                "INVALID_REQUEST" => "Invalid locations. Try entering full addresses.".to_string(),
                "NOT_FOUND" => "Route not found".to_string(),
                "ZERO_RESULTS" => "No route available".to_string(),
                "REQUEST_DENIED" => "API key is invalid or not configured.".to_string(),
                _ => status_message(*code)
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("Error: {}", status)),
            },
        }
    }
}

/// Canned message for well-known status codes
pub fn status_message(code: u16) -> Option<&'static str> {
    match code {
        429 => Some("Too many requests. Please try again in a moment."),
        500 => Some("Server error. Please try again later."),
        503 => Some("Service temporarily unavailable. Please retry."),
        _ => None,
    }
}

fn status_code_for(status: &str) -> u16 {
    match status {
        "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => 429,
        "REQUEST_DENIED" => 403,
        "INVALID_REQUEST" | "MAX_ROUTE_LENGTH_EXCEEDED" | "MAX_WAYPOINTS_EXCEEDED" => 400,
        "NOT_FOUND" | "ZERO_RESULTS" => 404,
        _ => 500,
    }
}
