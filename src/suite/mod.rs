//! Scenario suite model and runner
//!
//! A suite is an ordered list of scenarios, each pairing a resource directory
//! of agent config files with an expectation about the trust-failure line in
//! the agent's output. Scenarios run strictly one after another: only a
//! single agent instance may exist, and every scenario overwrites the same
//! installed config paths.

mod config;
mod runner;

pub use config::{Scenario, Suite, TARGET_STRING};
pub use runner::{output_contains_target, run_suite, ScenarioResult};
