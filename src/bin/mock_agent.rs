//! Mock agent control binary for integration testing
//!
//! Implements the agent ctl surface (`start`/`stop`) without a real agent.
//! `start` reads the staged config pair, simulates one endpoint connection
//! attempt and appends the outcome to the log file. The common-config and
//! log locations come from `MOCK_AGENT_COMMON_CONFIG` / `MOCK_AGENT_LOG`,
//! set by the test harness.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// CA subject marker a bundle must carry for the mock to trust the endpoint
const ENDPOINT_CA_MARKER: &str = "MOCK ENDPOINT CA";

const TRUST_FAILURE_LINE: &str =
    "E! failed to reach endpoint: x509: certificate signed by unknown authority";

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("start") => start(&args[1..]),
        Some("stop") => {}
        _ => {
            eprintln!("usage: mock_agent start --config file:<path> [--fetch-config] | stop");
            std::process::exit(2);
        }
    }
}

fn start(args: &[String]) {
    let mut config_path: Option<PathBuf> = None;
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--config" if i + 1 < args.len() => {
                config_path = Some(PathBuf::from(args[i + 1].trim_start_matches("file:")));
                i += 2;
            }
            "--fetch-config" => i += 1,
            _ => i += 1,
        }
    }

    let config_path = config_path.unwrap_or_else(|| {
        eprintln!("mock_agent: missing --config");
        std::process::exit(2);
    });

    let common_config_path = PathBuf::from(
        std::env::var("MOCK_AGENT_COMMON_CONFIG")
            .unwrap_or_else(|_| "/tmp/mock-agent/common-config.toml".to_string()),
    );
    let log_path = PathBuf::from(
        std::env::var("MOCK_AGENT_LOG")
            .unwrap_or_else(|_| "/tmp/mock-agent/agent.log".to_string()),
    );

    let endpoint = read_endpoint(&config_path);
    let bundle = read_bundle_path(&common_config_path);

    let mut lines = vec![format!("I! loaded config {}", config_path.display())];
    match endpoint.as_deref() {
        Some(url) if url.starts_with("https://") => {
            if bundle_trusts_endpoint(bundle.as_deref()) {
                lines.push(format!("I! reached endpoint {url}"));
            } else {
                lines.push(TRUST_FAILURE_LINE.to_string());
            }
        }
        Some(url) => lines.push(format!("I! reached endpoint {url}")),
        None => lines.push("W! no endpoint configured".to_string()),
    }

    append_log(&log_path, &lines);
}

fn read_endpoint(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let config: Value = serde_json::from_str(&content).ok()?;
    config
        .pointer("/metrics/endpoint_override")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn read_bundle_path(path: &Path) -> Option<PathBuf> {
    let content = std::fs::read_to_string(path).ok()?;
    let config: toml::Value = toml::from_str(&content).ok()?;
    config
        .get("ssl")
        .and_then(|ssl| ssl.get("ca_bundle_path"))
        .and_then(toml::Value::as_str)
        .map(PathBuf::from)
}

fn bundle_trusts_endpoint(bundle: Option<&Path>) -> bool {
    match bundle {
        Some(path) => std::fs::read_to_string(path)
            .map(|pem| pem.contains(ENDPOINT_CA_MARKER))
            .unwrap_or(false),
        None => false,
    }
}

fn append_log(path: &Path, lines: &[String]) {
    if let Some(dir) = path.parent() {
        let _ = std::fs::create_dir_all(dir);
    }

    let mut file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("mock_agent: cannot open log {}: {e}", path.display());
            std::process::exit(1);
        }
    };

    for line in lines {
        let _ = writeln!(file, "{line}");
    }
}
