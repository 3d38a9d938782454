//! CLI command handling
//!
//! Dispatches CLI commands to the suite runner and formats output.

use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::agent::CtlAgent;
use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::{Error, Result};
use crate::staging;
use crate::suite::{run_suite, Suite};

/// Dispatch a CLI command
pub async fn dispatch(command: Commands) -> Result<()> {
    match command {
        Commands::Run {
            suite,
            scenario,
            resources,
            runtime,
            verbose,
        } => {
            let cfg = Config::load()?;
            let mut suite = load_suite(suite.as_deref())?;

            if let Some(name) = &scenario {
                let selected = suite
                    .find(name)
                    .cloned()
                    .ok_or_else(|| Error::UnknownScenario(name.clone()))?;
                suite.scenarios = vec![selected];
            }

            let runtime = Duration::from_secs(runtime.unwrap_or(cfg.timeouts.runtime_secs));
            let mut agent = CtlAgent::new(&cfg)?;

            let results =
                run_suite(&cfg, &suite, &resources, &mut agent, runtime, verbose).await;

            let failed = results.iter().filter(|r| !r.passed).count();
            if failed > 0 {
                return Err(Error::SuiteFailed {
                    failed,
                    total: results.len(),
                });
            }
            Ok(())
        }

        Commands::List { suite } => {
            let suite = load_suite(suite.as_deref())?;

            println!("{} {}", "Suite:".blue().bold(), suite.name.white().bold());
            for scenario in &suite.scenarios {
                let expect = if scenario.expect_trust_failure {
                    "trust failure expected".yellow()
                } else {
                    "no trust failure expected".green()
                };
                println!("  {} ({})", scenario.name.white().bold(), expect);
                if let Some(desc) = &scenario.description {
                    println!("    {}", desc.dimmed());
                }
            }
            Ok(())
        }

        Commands::Stage {
            name,
            suite,
            resources,
        } => {
            let cfg = Config::load()?;
            let suite = load_suite(suite.as_deref())?;
            let scenario = suite
                .find(&name)
                .ok_or_else(|| Error::UnknownScenario(name.clone()))?;

            let config_path =
                staging::stage_scenario(&cfg, &resources.join(&scenario.resources))?;

            println!(
                "Staged {}:\n  {}\n  {}",
                scenario.name,
                config_path.display(),
                cfg.agent.common_config_path.display()
            );
            Ok(())
        }
    }
}

fn load_suite(path: Option<&Path>) -> Result<Suite> {
    match path {
        Some(path) => Suite::load(path),
        None => Ok(Suite::builtin()),
    }
}
