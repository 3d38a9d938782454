//! CLI command definitions
//!
//! Defines the clap commands for the harness.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run the verification suite against the agent
    Run {
        /// Suite definition file (YAML); defaults to the built-in CA bundle suite
        #[arg(long)]
        suite: Option<PathBuf>,

        /// Only run the named scenario
        #[arg(long)]
        scenario: Option<String>,

        /// Root directory holding scenario resources
        #[arg(long, default_value = "resources")]
        resources: PathBuf,

        /// Agent run window in seconds (overrides the configured value)
        #[arg(long)]
        runtime: Option<u64>,

        /// Print captured agent output for each scenario
        #[arg(long, short)]
        verbose: bool,
    },

    /// List the scenarios of the selected suite
    List {
        /// Suite definition file (YAML); defaults to the built-in CA bundle suite
        #[arg(long)]
        suite: Option<PathBuf>,
    },

    /// Stage a scenario's config files without starting the agent
    Stage {
        /// Scenario name
        name: String,

        /// Suite definition file (YAML); defaults to the built-in CA bundle suite
        #[arg(long)]
        suite: Option<PathBuf>,

        /// Root directory holding scenario resources
        #[arg(long, default_value = "resources")]
        resources: PathBuf,
    },
}
