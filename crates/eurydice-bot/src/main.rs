//! Entry point for the `eurydice` Slack onboarding bot.

mod bootstrap_helpers;

use anyhow::Result;
use clap::Parser;
use eurydice_cli::{validate_cli, Cli};
use eurydice_slack_runtime::run_slack_bridge;

use bootstrap_helpers::{build_slack_bridge_config, init_tracing};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    validate_cli(&cli)?;
    run_slack_bridge(build_slack_bridge_config(&cli)).await
}
