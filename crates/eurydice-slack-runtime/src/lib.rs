//! Slack Socket Mode runtime for the Eurydice onboarding bot.
//!
//! Receives events, slash commands and button clicks over Socket Mode,
//! acknowledges each envelope, and posts the replies the onboarding flow
//! and canned-reply tables call for.

mod slack_helpers;
mod slack_runtime;

pub use slack_runtime::{run_slack_bridge, SlackBridgeRuntimeConfig};
