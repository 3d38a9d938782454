//! Agent process control
//!
//! Drives the monitor agent through its control executable and captures the
//! log output produced during a run window. The harness assumes exclusive
//! ownership of the agent: `stop` must complete before another scenario may
//! call `start`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use crate::common::{config::Config, Error, Result};

/// Control surface for the agent under test
#[async_trait]
pub trait AgentControl {
    /// Start the agent with the given installed config, optionally forcing a
    /// config reload
    async fn start(&mut self, config: &Path, fetch_config: bool) -> Result<()>;

    /// Stop the agent
    async fn stop(&mut self) -> Result<()>;

    /// Log output produced since the last `start`
    async fn read_output(&mut self) -> Result<String>;
}

/// Agent controlled through its ctl executable
pub struct CtlAgent {
    ctl: PathBuf,
    log_path: PathBuf,
    ctl_timeout: Duration,
    /// Log size recorded at `start`; output reads cover bytes appended since
    run_offset: u64,
}

impl CtlAgent {
    pub fn new(cfg: &Config) -> Result<Self> {
        let ctl = cfg.resolve_ctl()?;
        Ok(Self {
            ctl,
            log_path: cfg.agent.log_path.clone(),
            ctl_timeout: Duration::from_secs(cfg.timeouts.ctl_secs),
            run_offset: 0,
        })
    }

    async fn run_ctl(&self, args: &[String]) -> Result<std::process::Output> {
        tracing::debug!(ctl = %self.ctl.display(), ?args, "invoking agent ctl");
        let output = tokio::time::timeout(
            self.ctl_timeout,
            Command::new(&self.ctl).args(args).output(),
        )
        .await
        .map_err(|_| Error::CtlTimeout(self.ctl_timeout.as_secs()))??;
        Ok(output)
    }
}

#[async_trait]
impl AgentControl for CtlAgent {
    async fn start(&mut self, config: &Path, fetch_config: bool) -> Result<()> {
        // High-water mark so read_output only sees this run's lines
        self.run_offset = match tokio::fs::metadata(&self.log_path).await {
            Ok(meta) => meta.len(),
            Err(_) => 0,
        };

        let mut args = vec![
            "start".to_string(),
            "--config".to_string(),
            format!("file:{}", config.display()),
        ];
        if fetch_config {
            args.push("--fetch-config".to_string());
        }

        let output = self.run_ctl(&args).await?;
        if !output.status.success() {
            return Err(Error::AgentStart(format!(
                "ctl exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!(config = %config.display(), fetch_config, "agent started");
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        let output = self.run_ctl(&["stop".to_string()]).await?;
        if !output.status.success() {
            return Err(Error::AgentStop(format!(
                "ctl exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        tracing::info!("agent stopped");
        Ok(())
    }

    async fn read_output(&mut self) -> Result<String> {
        // A missing log means the agent produced no output, not an error
        let data = match tokio::fs::read(&self.log_path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(String::new()),
            Err(e) => {
                return Err(Error::AgentOutput(format!(
                    "{}: {}",
                    self.log_path.display(),
                    e
                )))
            }
        };

        let start = (self.run_offset as usize).min(data.len());
        Ok(String::from_utf8_lossy(&data[start..]).into_owned())
    }
}
