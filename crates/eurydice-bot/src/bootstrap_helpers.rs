use std::time::Duration;

use eurydice_cli::Cli;
use eurydice_slack_runtime::SlackBridgeRuntimeConfig;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

pub(crate) fn init_tracing() {
    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .init();
}

pub(crate) fn build_slack_bridge_config(cli: &Cli) -> SlackBridgeRuntimeConfig {
    SlackBridgeRuntimeConfig {
        api_base: cli.slack_api_base.trim().to_string(),
        app_token: cli.slack_app_token.trim().to_string(),
        bot_token: cli.slack_bot_token.trim().to_string(),
        bot_user_id: cli.slack_bot_user_id.clone(),
        restart_command: cli.restart_command.trim().to_string(),
        request_timeout_ms: cli.slack_request_timeout_ms,
        reconnect_delay: Duration::from_millis(cli.slack_reconnect_delay_ms),
        reply_seed: cli.reply_seed,
    }
}
