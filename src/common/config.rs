//! Configuration file handling

use serde::Deserialize;
use std::path::PathBuf;

use super::paths;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Agent control and install locations
    #[serde(default)]
    pub agent: AgentConfig,

    /// Timeout settings
    #[serde(default)]
    pub timeouts: Timeouts,

    /// Endpoint hostname substitution settings
    #[serde(default)]
    pub endpoint: EndpointConfig,
}

/// Agent control and install locations
#[derive(Debug, Deserialize, Clone)]
pub struct AgentConfig {
    /// Agent control executable; bare names are resolved via PATH
    #[serde(default = "paths::default_ctl_path")]
    pub ctl_path: PathBuf,

    /// Install target for the scenario's JSON configuration
    #[serde(default = "paths::default_agent_config_path")]
    pub config_path: PathBuf,

    /// Install target for the scenario's common TOML configuration
    #[serde(default = "paths::default_common_config_path")]
    pub common_config_path: PathBuf,

    /// Agent log file captured after each run
    #[serde(default = "paths::default_agent_log_path")]
    pub log_path: PathBuf,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            ctl_path: paths::default_ctl_path(),
            config_path: paths::default_agent_config_path(),
            common_config_path: paths::default_common_config_path(),
            log_path: paths::default_agent_log_path(),
        }
    }
}

/// Timeout settings in seconds
#[derive(Debug, Deserialize)]
pub struct Timeouts {
    /// Fixed window the agent is left running to attempt its endpoint call
    #[serde(default = "default_runtime")]
    pub runtime_secs: u64,

    /// Timeout for a single ctl invocation
    #[serde(default = "default_ctl")]
    pub ctl_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            runtime_secs: default_runtime(),
            ctl_secs: default_ctl(),
        }
    }
}

fn default_runtime() -> u64 {
    30
}
fn default_ctl() -> u64 {
    60
}

/// Endpoint hostname substitution settings
#[derive(Debug, Deserialize, Clone)]
pub struct EndpointConfig {
    /// Hostname token scenario configs carry in place of the real endpoint
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Environment variable holding the real endpoint host
    #[serde(default = "default_host_env")]
    pub host_env: String,

    /// Host used when the environment variable is unset
    #[serde(default = "default_host")]
    pub default_host: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            placeholder: default_placeholder(),
            host_env: default_host_env(),
            default_host: default_host(),
        }
    }
}

fn default_placeholder() -> String {
    "endpoint_hostname".to_string()
}
fn default_host_env() -> String {
    "TEST_ENDPOINT_HOST".to_string()
}
fn default_host() -> String {
    "localhost".to_string()
}

impl Config {
    /// Load configuration from the default config file
    ///
    /// Returns default configuration if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = paths::config_path() {
            if path.exists() {
                let content = std::fs::read_to_string(&path)
                    .map_err(|e| Error::file_read(&path, e))?;
                return toml::from_str(&content)
                    .map_err(|e| Error::ConfigParse(e.to_string()));
            }
        }
        Ok(Self::default())
    }

    /// Resolve the agent control executable
    ///
    /// Bare names are searched on PATH; explicit paths must exist
    pub fn resolve_ctl(&self) -> Result<PathBuf> {
        let ctl = &self.agent.ctl_path;
        if ctl.components().count() > 1 {
            if ctl.exists() {
                return Ok(ctl.clone());
            }
            return Err(Error::CtlNotFound(ctl.display().to_string()));
        }
        which::which(ctl).map_err(|_| Error::CtlNotFound(ctl.display().to_string()))
    }
}
