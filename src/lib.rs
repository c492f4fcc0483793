//! # fare-estimator
//!
//! Distance, duration and traffic lookups for intracity trip fare estimation,
//! with every call to the mapping provider guarded by a response cache and a
//! per-endpoint rate limiter.
//!
//! ## Features
//!
//! - **Response Cache**: TTL and FIFO-bounded cache for routes and place suggestions
//! - **Rate Limiting**: minimum spacing, sliding minute/hour windows and daily caps per endpoint
//! - **Backoff**: exponential backoff with deferred automatic retries
//! - **Quota Tracking**: global daily and monthly ceilings with warning thresholds
//! - **Local Directory**: built-in place list that answers suggestions without a network call
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fare_estimator::{Config, Estimator};
//! use fare_estimator::config::EndpointKey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let estimator = Estimator::new(config)?;
//!
//!     let status = estimator
//!         .route(EndpointKey::Directions, "Ulubari", "Beltola")
//!         .await;
//!     if let Some(route) = status.value() {
//!         println!("{:.1} km, {} traffic", route.distance_km, route.traffic_level);
//!     }
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Public module exports
pub mod config;
pub mod core;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use utils::error::{FareError, Result};

pub use core::orchestrator::{FetchEvent, FetchOrchestrator, FetchStatus, InputError, RouteRequest};
pub use core::providers::{GoogleMapsProvider, MapsProvider, ProviderError};
pub use core::traffic::TrafficLevel;
pub use core::types::{DataSource, PlaceSuggestion, RouteEstimate};
pub use core::{Estimator, EstimatorStatus};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
