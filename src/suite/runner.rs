//! Suite runner
//!
//! Drives each scenario through the stage/start/wait/stop/read cycle and
//! compares the captured output against the scenario's expectation.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::agent::AgentControl;
use crate::common::config::Config;
use crate::common::Result;
use crate::staging;

use super::config::{Scenario, Suite, TARGET_STRING};

/// Outcome of a single scenario
#[derive(Debug)]
pub struct ScenarioResult {
    pub name: String,
    pub passed: bool,
    /// Whether the trust-failure line was expected
    pub expected: bool,
    /// Whether the trust-failure line was observed; None when the scenario
    /// aborted before its output could be read
    pub observed: Option<bool>,
    pub error: Option<String>,
}

/// Check whether agent output contains the trust-failure line.
///
/// Empty output is simply "absent".
pub fn output_contains_target(output: &str) -> bool {
    output.contains(TARGET_STRING)
}

/// Run every scenario in the suite, strictly one after another.
///
/// An expectation mismatch marks its scenario failed and the suite continues.
/// An infrastructure error aborts its scenario, is recorded on the result and
/// the suite likewise continues.
pub async fn run_suite(
    cfg: &Config,
    suite: &Suite,
    resources_root: &Path,
    agent: &mut dyn AgentControl,
    runtime: Duration,
    verbose: bool,
) -> Vec<ScenarioResult> {
    println!(
        "\n{} {}",
        "Running suite:".blue().bold(),
        suite.name.white().bold()
    );

    let mut results = Vec::with_capacity(suite.scenarios.len());
    for scenario in &suite.scenarios {
        let result = run_scenario(cfg, scenario, resources_root, agent, runtime, verbose).await;
        print_result(&result);
        results.push(result);
    }

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed == 0 {
        println!(
            "\n{} {}\n",
            "✓".green().bold(),
            "All scenarios passed".green().bold()
        );
    } else {
        println!(
            "\n{} {} of {} scenarios failed\n",
            "✗".red().bold(),
            failed,
            results.len()
        );
    }

    results
}

/// Run a single scenario and fold any infrastructure error into its result
async fn run_scenario(
    cfg: &Config,
    scenario: &Scenario,
    resources_root: &Path,
    agent: &mut dyn AgentControl,
    runtime: Duration,
    verbose: bool,
) -> ScenarioResult {
    tracing::info!(
        scenario = %scenario.name,
        expect_trust_failure = scenario.expect_trust_failure,
        "running scenario"
    );

    match drive(cfg, scenario, resources_root, agent, runtime, verbose).await {
        Ok(observed) => ScenarioResult {
            name: scenario.name.clone(),
            passed: observed == scenario.expect_trust_failure,
            expected: scenario.expect_trust_failure,
            observed: Some(observed),
            error: None,
        },
        Err(e) => {
            // The agent must not be left running into the next scenario
            let _ = agent.stop().await;

            ScenarioResult {
                name: scenario.name.clone(),
                passed: false,
                expected: scenario.expect_trust_failure,
                observed: None,
                error: Some(e.to_string()),
            }
        }
    }
}

/// Stage, run and capture one scenario; returns whether the trust-failure
/// line was observed
async fn drive(
    cfg: &Config,
    scenario: &Scenario,
    resources_root: &Path,
    agent: &mut dyn AgentControl,
    runtime: Duration,
    verbose: bool,
) -> Result<bool> {
    let resources = resources_root.join(&scenario.resources);
    let config_path = staging::stage_scenario(cfg, &resources)?;

    agent.start(&config_path, true).await?;

    // Give the agent the full window to attempt its endpoint call
    tokio::time::sleep(runtime).await;
    tracing::info!(secs = runtime.as_secs(), "agent run window elapsed");

    agent.stop().await?;

    let output = agent.read_output().await?;
    if verbose && !output.is_empty() {
        println!("{}", output.dimmed());
    }

    Ok(output_contains_target(&output))
}

fn print_result(result: &ScenarioResult) {
    match (&result.error, result.passed) {
        (Some(err), _) => {
            println!("  {} {}: {}", "✗".red(), result.name.white().bold(), err);
        }
        (None, true) => {
            let verdict = if result.observed == Some(true) {
                "trust failure present"
            } else {
                "trust failure absent"
            };
            println!(
                "  {} {} ({})",
                "✓".green(),
                result.name.white().bold(),
                verdict.dimmed()
            );
        }
        (None, false) => {
            println!(
                "  {} {}: expected trust failure {}, observed {}",
                "✗".red(),
                result.name.white().bold(),
                if result.expected { "present" } else { "absent" },
                if result.observed == Some(true) {
                    "present"
                } else {
                    "absent"
                }
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentControl;
    use crate::common::config::{AgentConfig, Config, EndpointConfig};
    use crate::common::Error;
    use async_trait::async_trait;
    use std::path::PathBuf;

    /// In-process agent double: replays canned output, counts lifecycle calls
    struct FakeAgent {
        output: String,
        fail_start: bool,
        started: usize,
        stopped: usize,
    }

    impl FakeAgent {
        fn with_output(output: &str) -> Self {
            Self {
                output: output.to_string(),
                fail_start: false,
                started: 0,
                stopped: 0,
            }
        }
    }

    #[async_trait]
    impl AgentControl for FakeAgent {
        async fn start(&mut self, _config: &Path, _fetch_config: bool) -> Result<()> {
            if self.fail_start {
                return Err(Error::AgentStart("ctl exited with Some(1)".to_string()));
            }
            self.started += 1;
            Ok(())
        }

        async fn stop(&mut self) -> Result<()> {
            self.stopped += 1;
            Ok(())
        }

        async fn read_output(&mut self) -> Result<String> {
            Ok(self.output.clone())
        }
    }

    fn test_config(root: &Path) -> Config {
        Config {
            agent: AgentConfig {
                config_path: root.join("bin").join("config.json"),
                common_config_path: root.join("etc").join("common-config.toml"),
                ..AgentConfig::default()
            },
            endpoint: EndpointConfig {
                host_env: "BUNDLE_CHECK_UNSET_HOST".to_string(),
                ..EndpointConfig::default()
            },
            ..Config::default()
        }
    }

    fn write_scenario(root: &Path, rel: &str) {
        let dir = root.join(rel);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("config.json"),
            r#"{"metrics":{"endpoint_override":"https://endpoint_hostname:4566"}}"#,
        )
        .unwrap();
        std::fs::write(dir.join("common-config.toml"), "# no overrides\n").unwrap();
    }

    fn scenario(name: &str, rel: &str, expect_trust_failure: bool) -> Scenario {
        Scenario {
            name: name.to_string(),
            resources: PathBuf::from(rel),
            expect_trust_failure,
            description: None,
        }
    }

    #[test]
    fn test_output_contains_target() {
        assert!(output_contains_target(
            "E! failed to reach endpoint: x509: certificate signed by unknown authority\n"
        ));
        assert!(!output_contains_target("I! reached endpoint\n"));
    }

    #[test]
    fn test_empty_output_is_absent() {
        assert!(!output_contains_target(""));
    }

    #[tokio::test]
    async fn test_verdicts_for_all_expectations() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        write_scenario(&resources, "a");
        write_scenario(&resources, "b");

        let cfg = test_config(dir.path());
        let suite = Suite {
            name: "verdicts".to_string(),
            scenarios: vec![scenario("hit", "a", true), scenario("miss", "b", false)],
        };

        let mut agent = FakeAgent::with_output(TARGET_STRING);
        let results = run_suite(
            &cfg,
            &suite,
            &resources,
            &mut agent,
            Duration::ZERO,
            false,
        )
        .await;

        assert_eq!(results.len(), 2);
        assert!(results[0].passed);
        assert!(!results[1].passed);
        assert_eq!(results[1].observed, Some(true));
    }

    #[tokio::test]
    async fn test_mismatch_does_not_stop_suite() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        write_scenario(&resources, "a");
        write_scenario(&resources, "b");

        let cfg = test_config(dir.path());
        let suite = Suite {
            name: "continue".to_string(),
            // First scenario mismatches, second must still run
            scenarios: vec![scenario("wrong", "a", true), scenario("right", "b", false)],
        };

        let mut agent = FakeAgent::with_output("I! reached endpoint\n");
        let results = run_suite(
            &cfg,
            &suite,
            &resources,
            &mut agent,
            Duration::ZERO,
            false,
        )
        .await;

        assert!(!results[0].passed);
        assert!(results[1].passed);
        assert_eq!(agent.started, 2);
        assert_eq!(agent.stopped, 2);
    }

    #[tokio::test]
    async fn test_infra_error_aborts_only_its_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        // Scenario directory missing entirely: staging fails before start
        let cfg = test_config(dir.path());
        write_scenario(&resources, "ok");

        let suite = Suite {
            name: "abort".to_string(),
            scenarios: vec![
                scenario("broken", "missing", false),
                scenario("ok", "ok", false),
            ],
        };

        let mut agent = FakeAgent::with_output("I! reached endpoint\n");
        let results = run_suite(
            &cfg,
            &suite,
            &resources,
            &mut agent,
            Duration::ZERO,
            false,
        )
        .await;

        assert!(!results[0].passed);
        assert!(results[0].error.is_some());
        assert_eq!(results[0].observed, None);
        assert!(results[1].passed);
        // Only the intact scenario reached the agent
        assert_eq!(agent.started, 1);
    }

    #[tokio::test]
    async fn test_failed_start_still_attempts_stop() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        write_scenario(&resources, "a");

        let cfg = test_config(dir.path());
        let suite = Suite {
            name: "cleanup".to_string(),
            scenarios: vec![scenario("fails", "a", false)],
        };

        let mut agent = FakeAgent::with_output("");
        agent.fail_start = true;
        let results = run_suite(
            &cfg,
            &suite,
            &resources,
            &mut agent,
            Duration::ZERO,
            false,
        )
        .await;

        assert!(!results[0].passed);
        assert_eq!(agent.started, 0);
        assert_eq!(agent.stopped, 1);
    }

    #[tokio::test]
    async fn test_rerun_yields_same_verdict() {
        let dir = tempfile::tempdir().unwrap();
        let resources = dir.path().join("resources");
        write_scenario(&resources, "a");

        let cfg = test_config(dir.path());
        let suite = Suite {
            name: "idempotent".to_string(),
            scenarios: vec![scenario("again", "a", true)],
        };

        let mut agent = FakeAgent::with_output(TARGET_STRING);
        for _ in 0..2 {
            let results = run_suite(
                &cfg,
                &suite,
                &resources,
                &mut agent,
                Duration::ZERO,
                false,
            )
            .await;
            assert!(results[0].passed);
            assert_eq!(results[0].observed, Some(true));
        }
    }
}
