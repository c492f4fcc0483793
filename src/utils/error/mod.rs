//! Error handling utilities
//!
//! Core services never fail (they recover into status values); this error type
//! covers configuration loading, client construction and the command line.

pub mod error;

pub use error::*;
