//! Integration tests for fare-estimator
//!
//! These tests verify the interaction between multiple components against a
//! mock mapping provider.

pub mod config_tests;
pub mod estimator_tests;
pub mod provider_tests;
