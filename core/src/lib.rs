//! # Vantage Core
//!
//! Shared utilities for the Vantage crates: rendering math aliases and
//! optional Tracy profiling macros.

pub mod math;
pub mod profiling;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
