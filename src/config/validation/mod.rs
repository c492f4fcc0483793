//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Top-level, provider and autocomplete validators
//! - `endpoint_validators`: Per-endpoint limit and backoff validators
//! - `cache_validators`: Cache and quota validators
//! - `tests`: Test suite for all validators

mod cache_validators;
mod config_validators;
mod endpoint_validators;
mod tests;
mod trait_def;

pub use trait_def::Validate;
