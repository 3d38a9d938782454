//! CA bundle verification harness for the monitor agent
//!
//! Drives an externally installed monitoring agent through scripted
//! start/run/stop cycles with per-scenario TLS configuration, then checks the
//! captured log output for certificate trust failures.

pub mod agent;
pub mod cli;
pub mod commands;
pub mod common;
pub mod staging;
pub mod suite;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use suite::{Scenario, Suite, TARGET_STRING};
