//! Scenario suite definitions
//!
//! Suites are either built in or deserialized from YAML files.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::common::{Error, Result};

/// Log line marking a TLS trust failure in the agent output
pub const TARGET_STRING: &str = "x509: certificate signed by unknown authority";

/// An ordered set of scenarios run against the agent
#[derive(Deserialize, Debug, Clone)]
pub struct Suite {
    /// Name of the suite
    pub name: String,
    /// The scenarios, in execution order
    pub scenarios: Vec<Scenario>,
}

/// A single agent run with an expectation about its output
#[derive(Deserialize, Debug, Clone)]
pub struct Scenario {
    /// Short name used for filtering and reporting
    pub name: String,
    /// Directory holding `config.json` and `common-config.toml`, relative to
    /// the resources root
    pub resources: PathBuf,
    /// Whether the trust-failure line is expected in the agent output
    pub expect_trust_failure: bool,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
}

impl Suite {
    /// Load a suite definition from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::SuiteParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        serde_yaml::from_str(&content).map_err(|e| Error::SuiteParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// The stock CA bundle suite
    ///
    /// Four fixed scenarios covering the combinations of endpoint scheme and
    /// configured bundle that decide whether the TLS handshake trusts the
    /// endpoint certificate.
    pub fn builtin() -> Self {
        Self {
            name: "ca-bundle".to_string(),
            scenarios: vec![
                Scenario {
                    name: "combine-bundle".to_string(),
                    resources: PathBuf::from("integration/ssl/with/combine/bundle"),
                    expect_trust_failure: false,
                    description: Some(
                        "system bundle plus endpoint CA; TLS connects".to_string(),
                    ),
                },
                Scenario {
                    name: "no-bundle-http".to_string(),
                    resources: PathBuf::from("integration/ssl/without/bundle/http"),
                    expect_trust_failure: false,
                    description: Some("plain HTTP endpoint; no TLS involved".to_string()),
                },
                Scenario {
                    name: "original-bundle".to_string(),
                    resources: PathBuf::from("integration/ssl/with/original/bundle"),
                    expect_trust_failure: true,
                    description: Some(
                        "system bundle only; endpoint cert untrusted".to_string(),
                    ),
                },
                Scenario {
                    name: "no-bundle".to_string(),
                    resources: PathBuf::from("integration/ssl/without/bundle"),
                    expect_trust_failure: true,
                    description: Some(
                        "no bundle configured; endpoint cert untrusted".to_string(),
                    ),
                },
            ],
        }
    }

    /// Find a scenario by name
    pub fn find(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}
