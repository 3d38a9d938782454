//! CA bundle verification harness for the monitor agent
//!
//! Stages per-scenario agent configuration, drives the agent through a
//! start/run/stop cycle and checks the captured log output for the TLS
//! trust-failure message.

use bundle_check::{cli, commands::Commands, common::logging};
use clap::Parser;

#[derive(Parser)]
#[command(name = "bundle-check", about = "CA bundle verification harness for the monitor agent")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() {
    logging::init_cli();

    let cli = Cli::parse();

    if let Err(e) = cli::dispatch(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
