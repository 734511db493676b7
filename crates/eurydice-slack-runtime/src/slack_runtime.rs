//! Slack Socket Mode runtime that receives events and sends onboarding replies.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use eurydice_onboarding::FlowGraph;
use futures_util::{SinkExt, StreamExt};
use rand::{rngs::StdRng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, info, warn};

use crate::slack_helpers::non_empty;

mod slack_api_client;
mod slack_dispatch;

use slack_api_client::{SlackApiClient, SlackMessagePoster};
use slack_dispatch::{deliver_outbound, OutboundMessage, SlackDispatchTable};

#[derive(Debug, Clone)]
/// Runtime configuration for the Slack Socket Mode loop.
pub struct SlackBridgeRuntimeConfig {
    pub api_base: String,
    pub app_token: String,
    pub bot_token: String,
    pub bot_user_id: Option<String>,
    pub restart_command: String,
    pub request_timeout_ms: u64,
    pub reconnect_delay: Duration,
    pub reply_seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct SlackSocketEnvelope {
    // `hello` frames carry no envelope id and need no ack.
    #[serde(default)]
    envelope_id: Option<String>,
    #[serde(rename = "type")]
    envelope_type: String,
    #[serde(default)]
    payload: Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Inbound Slack activity the bot reacts to.
pub(crate) enum SlackInboundEvent {
    Message {
        user_id: String,
        ts: String,
    },
    AppMention {
        channel_id: String,
        ts: String,
    },
    SlashCommand {
        command: String,
        user_id: String,
    },
    BlockAction {
        action_id: String,
        block_id: String,
        user_id: Option<String>,
    },
}

impl SlackInboundEvent {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Message { .. } => "message",
            Self::AppMention { .. } => "app_mention",
            Self::SlashCommand { .. } => "slash_command",
            Self::BlockAction { .. } => "block_action",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SocketSessionEnd {
    Reconnect,
    Shutdown,
}

/// Runs the Slack Socket Mode loop until interrupted.
pub async fn run_slack_bridge(config: SlackBridgeRuntimeConfig) -> Result<()> {
    let mut runtime = SlackBridgeRuntime::new(config).await?;
    runtime.run().await
}

struct SlackBridgeRuntime {
    config: SlackBridgeRuntimeConfig,
    slack_client: Arc<SlackApiClient>,
    dispatch: SlackDispatchTable,
    bot_user_id: String,
    rng: StdRng,
}

impl SlackBridgeRuntime {
    async fn new(config: SlackBridgeRuntimeConfig) -> Result<Self> {
        let slack_client = SlackApiClient::new(
            config.api_base.clone(),
            config.app_token.clone(),
            config.bot_token.clone(),
            config.request_timeout_ms,
        )?;

        let bot_user_id = match non_empty(config.bot_user_id.clone()) {
            Some(user_id) => user_id,
            None => slack_client.resolve_bot_user_id().await?,
        };

        let dispatch = SlackDispatchTable::new(FlowGraph::standard(config.restart_command.trim()));
        let rng = match config.reply_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        info!(
            bot_user_id = %bot_user_id,
            routes = dispatch.flow().triggers().count(),
            restart_command = %config.restart_command,
            "slack bridge initialized"
        );

        Ok(Self {
            config,
            slack_client: Arc::new(slack_client),
            dispatch,
            bot_user_id,
            rng,
        })
    }

    async fn run(&mut self) -> Result<()> {
        loop {
            let session_end = match self.slack_client.open_socket_connection().await {
                Ok(socket_url) => {
                    info!("slack bridge socket connected");
                    match self.run_socket_session(&socket_url).await {
                        Ok(end) => end,
                        Err(error) => {
                            warn!(
                                error = %format!("{error:#}"),
                                "slack bridge socket session error"
                            );
                            SocketSessionEnd::Reconnect
                        }
                    }
                }
                Err(error) => {
                    warn!(
                        error = %format!("{error:#}"),
                        "slack bridge failed to open socket connection"
                    );
                    SocketSessionEnd::Reconnect
                }
            };
            if session_end == SocketSessionEnd::Shutdown {
                info!("slack bridge shutdown requested");
                return Ok(());
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("slack bridge shutdown requested");
                    return Ok(());
                }
                _ = tokio::time::sleep(self.config.reconnect_delay) => {}
            }
        }
    }

    async fn run_socket_session(&mut self, socket_url: &str) -> Result<SocketSessionEnd> {
        let (stream, _response) = connect_async(socket_url)
            .await
            .with_context(|| "failed to connect slack socket mode websocket")?;
        let (mut sink, mut source) = stream.split();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    return Ok(SocketSessionEnd::Shutdown);
                }
                maybe_message = source.next() => {
                    let Some(message_result) = maybe_message else {
                        info!("slack socket closed by server");
                        return Ok(SocketSessionEnd::Reconnect);
                    };
                    let message = message_result.context("failed reading slack websocket message")?;
                    let Some(envelope) = parse_socket_envelope(message)? else {
                        continue;
                    };
                    if let Some(envelope_id) = envelope.envelope_id.as_deref() {
                        sink.send(socket_ack_message(envelope_id))
                            .await
                            .context("failed to send slack socket ack")?;
                    }
                    if envelope.envelope_type == "disconnect" {
                        info!(payload = %envelope.payload, "slack requested socket disconnect");
                        return Ok(SocketSessionEnd::Reconnect);
                    }
                    self.handle_envelope(&envelope);
                }
            }
        }
    }

    fn handle_envelope(&mut self, envelope: &SlackSocketEnvelope) {
        let batches = match self.plan_envelope(envelope) {
            Ok(batches) => batches,
            Err(error) => {
                warn!(
                    envelope_type = %envelope.envelope_type,
                    error = %format!("{error:#}"),
                    "failed to decode slack envelope"
                );
                return;
            }
        };

        for (kind, messages) in batches {
            let poster: Arc<dyn SlackMessagePoster> = self.slack_client.clone();
            tokio::spawn(async move {
                if let Err(error) = deliver_outbound(poster.as_ref(), &messages).await {
                    warn!(kind, error = %format!("{error:#}"), "slack reply delivery failed");
                }
            });
        }
    }

    /// Normalizes one envelope and plans the replies for each event it carries.
    fn plan_envelope(
        &mut self,
        envelope: &SlackSocketEnvelope,
    ) -> Result<Vec<(&'static str, Vec<OutboundMessage>)>> {
        let events = normalize_socket_envelope(envelope, &self.bot_user_id)?;
        let mut batches = Vec::with_capacity(events.len());
        for event in events {
            let messages = self.dispatch.plan(&event, &mut self.rng);
            debug!(
                kind = event.kind(),
                planned = messages.len(),
                "slack event dispatched"
            );
            if !messages.is_empty() {
                batches.push((event.kind(), messages));
            }
        }
        Ok(batches)
    }
}

fn socket_ack_message(envelope_id: &str) -> WsMessage {
    WsMessage::Text(json!({ "envelope_id": envelope_id }).to_string().into())
}

fn parse_socket_envelope(message: WsMessage) -> Result<Option<SlackSocketEnvelope>> {
    match message {
        WsMessage::Text(text) => {
            let envelope = serde_json::from_str::<SlackSocketEnvelope>(&text)
                .context("failed to parse slack socket envelope")?;
            Ok(Some(envelope))
        }
        WsMessage::Binary(bytes) => {
            let text =
                String::from_utf8(bytes.to_vec()).context("invalid utf-8 slack socket payload")?;
            let envelope = serde_json::from_str::<SlackSocketEnvelope>(&text)
                .context("failed to parse slack socket envelope")?;
            Ok(Some(envelope))
        }
        WsMessage::Ping(_) | WsMessage::Pong(_) => Ok(None),
        WsMessage::Close(_) => Ok(None),
        WsMessage::Frame(_) => Ok(None),
    }
}

#[derive(Debug, Deserialize)]
struct SlackEventCallbackEnvelope {
    #[serde(rename = "type")]
    callback_type: String,
    event: SlackEventPayload,
}

#[derive(Debug, Deserialize)]
struct SlackEventPayload {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SlackSlashCommandPayload {
    command: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct SlackInteractionPayload {
    #[serde(rename = "type")]
    interaction_type: String,
    #[serde(default)]
    user: Option<SlackInteractionUser>,
    #[serde(default)]
    actions: Vec<SlackBlockActionPayload>,
}

#[derive(Debug, Deserialize)]
struct SlackInteractionUser {
    id: String,
}

#[derive(Debug, Deserialize)]
struct SlackBlockActionPayload {
    action_id: String,
    #[serde(default)]
    block_id: Option<String>,
}

fn normalize_socket_envelope(
    envelope: &SlackSocketEnvelope,
    bot_user_id: &str,
) -> Result<Vec<SlackInboundEvent>> {
    match envelope.envelope_type.as_str() {
        "events_api" => normalize_events_api_payload(&envelope.payload, bot_user_id),
        "slash_commands" => {
            let payload =
                serde_json::from_value::<SlackSlashCommandPayload>(envelope.payload.clone())
                    .context("failed to decode slack slash command payload")?;
            let (Some(command), Some(user_id)) =
                (non_empty(Some(payload.command)), non_empty(Some(payload.user_id)))
            else {
                return Ok(Vec::new());
            };
            Ok(vec![SlackInboundEvent::SlashCommand { command, user_id }])
        }
        "interactive" => {
            let payload =
                serde_json::from_value::<SlackInteractionPayload>(envelope.payload.clone())
                    .context("failed to decode slack interaction payload")?;
            if payload.interaction_type != "block_actions" {
                return Ok(Vec::new());
            }
            let user_id = payload.user.map(|user| user.id);
            Ok(payload
                .actions
                .into_iter()
                .filter_map(|action| {
                    let block_id = non_empty(action.block_id)?;
                    Some(SlackInboundEvent::BlockAction {
                        action_id: action.action_id,
                        block_id,
                        user_id: user_id.clone(),
                    })
                })
                .collect())
        }
        _ => Ok(Vec::new()),
    }
}

fn normalize_events_api_payload(
    payload: &Value,
    bot_user_id: &str,
) -> Result<Vec<SlackInboundEvent>> {
    let callback = serde_json::from_value::<SlackEventCallbackEnvelope>(payload.clone())
        .context("failed to decode slack event callback payload")?;
    if callback.callback_type != "event_callback" {
        return Ok(Vec::new());
    }

    let event = callback.event;
    if event.bot_id.is_some() || event.subtype.as_deref() == Some("bot_message") {
        return Ok(Vec::new());
    }
    let Some(user_id) = non_empty(event.user) else {
        return Ok(Vec::new());
    };
    if user_id == bot_user_id {
        return Ok(Vec::new());
    }
    let (Some(channel_id), Some(ts)) = (non_empty(event.channel), non_empty(event.ts)) else {
        return Ok(Vec::new());
    };

    let normalized = match event.event_type.as_str() {
        "app_mention" => SlackInboundEvent::AppMention { channel_id, ts },
        "message" if is_user_message_subtype(event.subtype.as_deref()) => {
            SlackInboundEvent::Message { user_id, ts }
        }
        _ => return Ok(Vec::new()),
    };
    Ok(vec![normalized])
}

fn is_user_message_subtype(subtype: Option<&str>) -> bool {
    matches!(
        subtype,
        None | Some("file_share") | Some("thread_broadcast") | Some("me_message")
    )
}
