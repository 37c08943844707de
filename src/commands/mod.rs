//! Command implementations for the CLI
//!
//! - start: Start the exporter server
//! - fetch: Fetch the target once
//! - config: Configuration display and validation

pub mod config;
pub mod fetch;
pub mod start;
