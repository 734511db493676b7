//! Startup validation for parsed CLI configuration.

use thiserror::Error;

use crate::Cli;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Enumerates fatal startup configuration problems.
pub enum CliValidationError {
    #[error("{flag} must not be empty")]
    EmptyToken { flag: &'static str },
    #[error("--restart-command must start with '/' (got '{command}')")]
    InvalidRestartCommand { command: String },
    #[error("--slack-api-base must be an http(s) URL (got '{api_base}')")]
    InvalidApiBase { api_base: String },
}

/// Rejects configuration the Slack runtime cannot start with.
pub fn validate_cli(cli: &Cli) -> Result<(), CliValidationError> {
    if cli.slack_bot_token.trim().is_empty() {
        return Err(CliValidationError::EmptyToken {
            flag: "--slack-bot-token",
        });
    }
    if cli.slack_app_token.trim().is_empty() {
        return Err(CliValidationError::EmptyToken {
            flag: "--slack-app-token",
        });
    }

    let command = cli.restart_command.trim();
    if !command.starts_with('/') || command.len() < 2 || command.contains(char::is_whitespace) {
        return Err(CliValidationError::InvalidRestartCommand {
            command: cli.restart_command.clone(),
        });
    }

    let api_base = cli.slack_api_base.trim();
    if !(api_base.starts_with("https://") || api_base.starts_with("http://")) {
        return Err(CliValidationError::InvalidApiBase {
            api_base: cli.slack_api_base.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{validate_cli, CliValidationError};
    use crate::Cli;

    fn parse(extra: &[&str]) -> Cli {
        let mut args = vec![
            "eurydice",
            "--slack-bot-token",
            "xoxb-test",
            "--slack-app-token",
            "xapp-test",
        ];
        args.extend_from_slice(extra);
        Cli::try_parse_from(args).expect("parse cli")
    }

    #[test]
    fn unit_validate_cli_accepts_defaults() {
        assert_eq!(validate_cli(&parse(&[])), Ok(()));
    }

    #[test]
    fn regression_validate_cli_rejects_blank_tokens() {
        let mut cli = parse(&[]);
        cli.slack_app_token = "   ".to_string();
        assert_eq!(
            validate_cli(&cli),
            Err(CliValidationError::EmptyToken {
                flag: "--slack-app-token"
            })
        );

        cli.slack_bot_token = String::new();
        let error = validate_cli(&cli).expect_err("blank bot token");
        assert_eq!(error.to_string(), "--slack-bot-token must not be empty");
    }

    #[test]
    fn regression_validate_cli_rejects_malformed_restart_command() {
        for command in ["eurydice-restart", "/", "/two words"] {
            let cli = parse(&["--restart-command", command]);
            assert!(matches!(
                validate_cli(&cli),
                Err(CliValidationError::InvalidRestartCommand { .. })
            ));
        }
    }

    #[test]
    fn regression_validate_cli_rejects_non_http_api_base() {
        let cli = parse(&["--slack-api-base", "slack.com/api"]);
        assert!(matches!(
            validate_cli(&cli),
            Err(CliValidationError::InvalidApiBase { .. })
        ));
    }
}
