//! Scenario config staging
//!
//! Rewrites the endpoint hostname placeholder in a scenario's JSON config and
//! installs the scenario's config pair onto the agent's fixed paths.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::common::{config::Config, Error, Result};

/// Scenario JSON config file name
pub const CONFIG_JSON: &str = "config.json";

/// Scenario common TOML config file name
pub const COMMON_CONFIG_TOML: &str = "common-config.toml";

/// Resolve the endpoint host the placeholder should be rewritten to
pub fn endpoint_host(cfg: &Config) -> String {
    std::env::var(&cfg.endpoint.host_env)
        .unwrap_or_else(|_| cfg.endpoint.default_host.clone())
}

/// Replace the placeholder hostname token in `path` with `host`, in place.
///
/// A config without the token is left untouched (plain-HTTP scenarios and
/// already-rewritten files).
pub fn replace_host(path: &Path, placeholder: &str, host: &str) -> Result<()> {
    let content =
        std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
    if !content.contains(placeholder) {
        return Ok(());
    }
    let rewritten = content.replace(placeholder, host);
    std::fs::write(path, rewritten).map_err(|e| Error::staging(path, e))?;
    Ok(())
}

/// Install a scenario file at an agent config path.
///
/// Writes through a temp file in the destination directory and renames it
/// into place, so the agent never observes a half-written config.
pub fn install(src: &Path, dest: &Path) -> Result<()> {
    let content = std::fs::read(src).map_err(|e| Error::file_read(src, e))?;

    let dir = dest.parent().ok_or_else(|| {
        Error::staging(dest, "destination has no parent directory")
    })?;
    std::fs::create_dir_all(dir).map_err(|e| Error::staging(dest, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| Error::staging(dest, e))?;
    tmp.write_all(&content).map_err(|e| Error::staging(dest, e))?;
    tmp.persist(dest).map_err(|e| Error::staging(dest, e))?;
    Ok(())
}

/// Stage a scenario's config pair.
///
/// Substitutes the endpoint hostname in `<scenario>/config.json`, then
/// installs it and `<scenario>/common-config.toml` onto the agent's fixed
/// paths. Returns the installed JSON config path the agent is started with.
pub fn stage_scenario(cfg: &Config, resources: &Path) -> Result<PathBuf> {
    let json_src = resources.join(CONFIG_JSON);
    let toml_src = resources.join(COMMON_CONFIG_TOML);

    let host = endpoint_host(cfg);
    replace_host(&json_src, &cfg.endpoint.placeholder, &host)?;

    install(&json_src, &cfg.agent.config_path)?;
    install(&toml_src, &cfg.agent.common_config_path)?;

    tracing::debug!(scenario = %resources.display(), host = %host, "staged agent config");
    Ok(cfg.agent.config_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::config::{AgentConfig, Config, EndpointConfig};

    fn test_config(root: &Path) -> Config {
        Config {
            agent: AgentConfig {
                config_path: root.join("bin").join("config.json"),
                common_config_path: root.join("etc").join("common-config.toml"),
                ..AgentConfig::default()
            },
            endpoint: EndpointConfig {
                // An env var no environment sets, so the fallback host is used
                host_env: "BUNDLE_CHECK_UNSET_HOST".to_string(),
                ..EndpointConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_replace_host_rewrites_placeholder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"metrics":{"endpoint_override":"https://endpoint_hostname:4566"}}"#,
        )
        .unwrap();

        replace_host(&path, "endpoint_hostname", "127.0.0.1").unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("https://127.0.0.1:4566"));
        assert!(!content.contains("endpoint_hostname"));
    }

    #[test]
    fn test_replace_host_without_placeholder_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let original = r#"{"metrics":{"endpoint_override":"http://10.0.0.1:4566"}}"#;
        std::fs::write(&path, original).unwrap();

        replace_host(&path, "endpoint_hostname", "127.0.0.1").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), original);
    }

    #[test]
    fn test_install_creates_destination_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("config.json");
        std::fs::write(&src, "{}").unwrap();

        let dest = dir.path().join("opt").join("agent").join("config.json");
        install(&src, &dest).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "{}");
    }

    #[test]
    fn test_install_missing_source_fails() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("missing.json");
        let dest = dir.path().join("config.json");
        assert!(matches!(
            install(&src, &dest),
            Err(Error::FileRead { .. })
        ));
    }

    #[test]
    fn test_stage_scenario_installs_pair() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("scenario");
        std::fs::create_dir_all(&resources).unwrap();
        std::fs::write(
            resources.join(CONFIG_JSON),
            r#"{"metrics":{"endpoint_override":"https://endpoint_hostname:4566"}}"#,
        )
        .unwrap();
        std::fs::write(resources.join(COMMON_CONFIG_TOML), "[ssl]\n").unwrap();

        let cfg = test_config(dir.path());
        let installed = stage_scenario(&cfg, &resources).unwrap();

        assert_eq!(installed, cfg.agent.config_path);
        let json = std::fs::read_to_string(&cfg.agent.config_path).unwrap();
        assert!(json.contains("localhost"));
        assert!(cfg.agent.common_config_path.exists());
    }
}
