//! Event-to-reply dispatch and sequential outbound delivery.

use anyhow::Result;
use eurydice_onboarding::{random_response, FlowGraph, FlowTrigger, SlackBlock};
use rand::Rng;
use tracing::debug;

use super::slack_api_client::SlackMessagePoster;
use super::SlackInboundEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutboundBody {
    Text(String),
    Blocks(Vec<SlackBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One `chat.postMessage` call planned in reply to an inbound event.
pub(crate) struct OutboundMessage {
    pub(crate) channel: String,
    pub(crate) body: OutboundBody,
    pub(crate) thread_ts: Option<String>,
}

impl OutboundMessage {
    fn threaded_text(channel: &str, text: String, thread_ts: &str) -> Self {
        Self {
            channel: channel.to_string(),
            body: OutboundBody::Text(text),
            thread_ts: Some(thread_ts.to_string()),
        }
    }

    fn blocks(channel: &str, blocks: Vec<SlackBlock>) -> Self {
        Self {
            channel: channel.to_string(),
            body: OutboundBody::Blocks(blocks),
            thread_ts: None,
        }
    }
}

/// Immutable routing table consulted for every inbound event.
///
/// Commands and button actions go through the onboarding [`FlowGraph`];
/// messages and mentions get a random canned reply.
#[derive(Debug, Clone)]
pub(crate) struct SlackDispatchTable {
    flow: FlowGraph,
}

impl SlackDispatchTable {
    pub(crate) fn new(flow: FlowGraph) -> Self {
        Self { flow }
    }

    pub(crate) fn flow(&self) -> &FlowGraph {
        &self.flow
    }

    pub(crate) fn plan<R>(&self, event: &SlackInboundEvent, rng: &mut R) -> Vec<OutboundMessage>
    where
        R: Rng + ?Sized,
    {
        match event {
            SlackInboundEvent::Message { user_id, ts, .. } => {
                vec![OutboundMessage::threaded_text(
                    user_id,
                    random_response(rng),
                    ts,
                )]
            }
            SlackInboundEvent::AppMention { channel_id, ts } => {
                vec![OutboundMessage::threaded_text(
                    channel_id,
                    random_response(rng),
                    ts,
                )]
            }
            SlackInboundEvent::SlashCommand { command, user_id } => {
                self.plan_flow(&FlowTrigger::command(command.as_str()), user_id)
            }
            SlackInboundEvent::BlockAction {
                action_id,
                block_id,
                user_id,
            } => {
                let clicked_by = user_id.as_deref();
                if let Some(user_id) = clicked_by.filter(|user_id| *user_id != block_id.as_str()) {
                    debug!(
                        clicked_by = user_id,
                        correlation_id = %block_id,
                        "button clicked by someone other than the onboarded user"
                    );
                }
                self.plan_flow(&FlowTrigger::action(action_id.as_str()), block_id)
            }
        }
    }

    fn plan_flow(&self, trigger: &FlowTrigger, correlation_id: &str) -> Vec<OutboundMessage> {
        let messages = self
            .flow
            .render_route(trigger, correlation_id)
            .into_iter()
            .map(|blocks| OutboundMessage::blocks(correlation_id, blocks))
            .collect::<Vec<_>>();
        if messages.is_empty() {
            debug!(?trigger, correlation_id, "no onboarding route for trigger");
        }
        messages
    }
}

/// Posts `messages` one after another, stopping at the first failure.
pub(crate) async fn deliver_outbound(
    poster: &dyn SlackMessagePoster,
    messages: &[OutboundMessage],
) -> Result<usize> {
    let mut delivered = 0_usize;
    for message in messages {
        let posted = poster.post_outbound(message).await?;
        debug!(channel = %posted.channel, ts = %posted.ts, "slack message posted");
        delivered = delivered.saturating_add(1);
    }
    Ok(delivered)
}
