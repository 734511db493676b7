//! CLI argument model and validation for the Eurydice bot binary.
//!
//! Every flag can also be supplied through the environment; the two Slack
//! tokens normally are.

pub mod cli_args;
pub mod validation;

pub use cli_args::Cli;
pub use validation::{validate_cli, CliValidationError};
