//! Error types for the CA bundle harness
//!
//! Infrastructure failures (staging, agent control, output retrieval) abort
//! the scenario they occur in. An expectation mismatch is not an `Error`; it
//! is recorded in the scenario result so the remaining scenarios still run.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Staging Errors ===
    #[error("Failed to stage '{path}': {reason}")]
    Staging { path: String, reason: String },

    // === Agent Control Errors ===
    #[error("Agent control executable '{0}' not found")]
    CtlNotFound(String),

    #[error("Agent failed to start: {0}")]
    AgentStart(String),

    #[error("Agent failed to stop: {0}")]
    AgentStop(String),

    #[error("Failed to read agent output: {0}")]
    AgentOutput(String),

    #[error("Agent control command timed out after {0} seconds")]
    CtlTimeout(u64),

    // === Suite Errors ===
    #[error("Failed to load suite '{path}': {reason}")]
    SuiteParse { path: String, reason: String },

    #[error("Unknown scenario '{0}'")]
    UnknownScenario(String),

    #[error("{failed} of {total} scenarios failed")]
    SuiteFailed { failed: usize, total: usize },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Internal Errors ===
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a staging error for a path
    pub fn staging(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        Self::Staging {
            path: path.display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a file read error for a path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
