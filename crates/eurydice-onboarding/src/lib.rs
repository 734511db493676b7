//! Onboarding script, Block Kit rendering, and canned replies for Eurydice.
//!
//! Everything here is pure data: the Slack runtime decides when to send what
//! this crate renders.

pub mod blocks;
pub mod flow;
pub mod replies;

pub use blocks::{
    render_blocks, Button, ButtonStyle, SlackBlock, SlackBlockElement, SlackTextObject,
};
pub use flow::{
    FlowGraph, FlowTrigger, OnboardingStep, DEFAULT_RESTART_COMMAND, TERMINAL_FEEDBACK_ACTIONS,
};
pub use replies::{all_responses, random_response, REPLY_BODIES, REPLY_SUFFIXES};
