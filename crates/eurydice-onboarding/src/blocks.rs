//! Slack Block Kit rendering for onboarding messages.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
/// Enumerates supported `ButtonStyle` values.
pub enum ButtonStyle {
    Primary,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A clickable button attached to an onboarding message.
pub struct Button {
    label: String,
    action_id: String,
    style: Option<ButtonStyle>,
}

impl Button {
    pub fn new(label: impl Into<String>, action_id: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action_id: action_id.into(),
            style: None,
        }
    }

    pub fn styled(
        label: impl Into<String>,
        action_id: impl Into<String>,
        style: ButtonStyle,
    ) -> Self {
        Self {
            style: Some(style),
            ..Self::new(label, action_id)
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn action_id(&self) -> &str {
        &self.action_id
    }

    pub fn style(&self) -> Option<ButtonStyle> {
        self.style
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackTextObject {
    Mrkdwn { text: String },
    PlainText { text: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackBlockElement {
    Button {
        text: SlackTextObject,
        action_id: String,
        // Slack rejects an empty style, so an unset style must not be sent at all.
        #[serde(skip_serializing_if = "Option::is_none")]
        style: Option<ButtonStyle>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
/// One Block Kit block of an outbound message.
pub enum SlackBlock {
    Section {
        text: SlackTextObject,
    },
    Actions {
        elements: Vec<SlackBlockElement>,
        block_id: String,
    },
}

impl SlackBlock {
    /// Returns the `block_id` of an actions block.
    pub fn correlation_id(&self) -> Option<&str> {
        match self {
            Self::Actions { block_id, .. } => Some(block_id.as_str()),
            Self::Section { .. } => None,
        }
    }
}

impl From<&Button> for SlackBlockElement {
    fn from(button: &Button) -> Self {
        Self::Button {
            text: SlackTextObject::PlainText {
                text: button.label.clone(),
            },
            action_id: button.action_id.clone(),
            style: button.style,
        }
    }
}

/// Renders `text` and `buttons` into Block Kit blocks.
///
/// The first block is always a mrkdwn section holding `text` verbatim. When
/// `buttons` is non-empty an actions block follows, with one element per
/// button in order and `block_id` set to `correlation_id` so a later click can
/// be traced back to the user it was sent to.
pub fn render_blocks(text: &str, buttons: &[Button], correlation_id: &str) -> Vec<SlackBlock> {
    let section = SlackBlock::Section {
        text: SlackTextObject::Mrkdwn {
            text: text.to_string(),
        },
    };
    if buttons.is_empty() {
        return vec![section];
    }

    vec![
        section,
        SlackBlock::Actions {
            elements: buttons.iter().map(SlackBlockElement::from).collect(),
            block_id: correlation_id.to_string(),
        },
    ]
}
