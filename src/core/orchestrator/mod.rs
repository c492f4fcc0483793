//! Fetch orchestration
//!
//! Every lookup runs the same sequence: validate input, consult the cache,
//! ask the rate limiter, call the provider once, then update cache and
//! limiter. Denials and failures surface as a [`FetchStatus`]; backoff
//! denials and retryable failures also schedule one deferred retry.

mod fetcher;
mod retry;
mod types;


pub use fetcher::FetchOrchestrator;
pub use types::{FetchEvent, FetchStatus, InputError, RouteRequest, estimate_from_leg};
