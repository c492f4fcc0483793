//! Utility modules for the fare estimator
//!
//! - **error**: Crate-level error type and result alias
//! - **format**: Human readable distance and duration strings

pub mod error;
pub mod format;

pub use error::{FareError, Result};
pub use format::{format_distance, format_duration};
