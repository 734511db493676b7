use clap::Parser;
use eurydice_onboarding::DEFAULT_RESTART_COMMAND;

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Parser)]
#[command(
    name = "eurydice",
    about = "Slack bot that walks new members through onboarding",
    version
)]
/// Command-line and environment configuration for the bot process.
pub struct Cli {
    #[arg(
        long = "slack-bot-token",
        env = "SLACK_XOXB_TOKEN",
        hide_env_values = true,
        help = "Slack bot token for Web API (xoxb-...)"
    )]
    pub slack_bot_token: String,

    #[arg(
        long = "slack-app-token",
        env = "SLACK_XAPP_TOKEN",
        hide_env_values = true,
        help = "Slack Socket Mode app token (xapp-...)"
    )]
    pub slack_app_token: String,

    #[arg(
        long = "slack-bot-user-id",
        env = "EURYDICE_SLACK_BOT_USER_ID",
        help = "Bot user id used to ignore self-authored events; resolved with auth.test when omitted"
    )]
    pub slack_bot_user_id: Option<String>,

    #[arg(
        long = "slack-api-base",
        env = "EURYDICE_SLACK_API_BASE",
        default_value = "https://slack.com/api",
        help = "Slack Web API base URL"
    )]
    pub slack_api_base: String,

    #[arg(
        long = "restart-command",
        env = "EURYDICE_RESTART_COMMAND",
        default_value = DEFAULT_RESTART_COMMAND,
        help = "Slash command that starts onboarding for the invoking user"
    )]
    pub restart_command: String,

    #[arg(
        long = "slack-request-timeout-ms",
        env = "EURYDICE_SLACK_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "HTTP timeout in milliseconds for Slack Web API calls"
    )]
    pub slack_request_timeout_ms: u64,

    #[arg(
        long = "slack-reconnect-delay-ms",
        env = "EURYDICE_SLACK_RECONNECT_DELAY_MS",
        default_value_t = 1_000,
        help = "Delay in milliseconds before reopening a dropped Socket Mode connection"
    )]
    pub slack_reconnect_delay_ms: u64,

    #[arg(
        long = "reply-seed",
        env = "EURYDICE_REPLY_SEED",
        help = "Seed for canned-reply selection; replies are drawn from OS entropy when unset"
    )]
    pub reply_seed: Option<u64>,
}
