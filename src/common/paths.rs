//! Harness configuration and agent install paths
//!
//! The agent reads its configuration from fixed locations under its install
//! prefix; every scenario overwrites those same two files, which is why only
//! one scenario may run at a time.

use std::path::PathBuf;

/// Name used for the harness config directory
const APP_NAME: &str = "bundle-check";

/// Default agent install prefix
const AGENT_PREFIX: &str = "/opt/monitor-agent";

/// Get the harness configuration directory path
///
/// Uses the directories crate for platform-appropriate locations:
/// - Linux: `~/.config/bundle-check/`
/// - macOS: `~/Library/Application Support/bundle-check/`
/// - Windows: `%APPDATA%\bundle-check\`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the harness configuration file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Default agent control executable
pub fn default_ctl_path() -> PathBuf {
    PathBuf::from(AGENT_PREFIX).join("bin").join("agent-ctl")
}

/// Where the agent reads its JSON configuration
pub fn default_agent_config_path() -> PathBuf {
    PathBuf::from(AGENT_PREFIX).join("bin").join("config.json")
}

/// Where the agent reads its common TOML configuration
pub fn default_common_config_path() -> PathBuf {
    PathBuf::from(AGENT_PREFIX).join("etc").join("common-config.toml")
}

/// Agent log file the run-window capture reads from
pub fn default_agent_log_path() -> PathBuf {
    PathBuf::from(AGENT_PREFIX).join("logs").join("agent.log")
}
