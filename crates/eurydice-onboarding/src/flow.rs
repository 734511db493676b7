//! Onboarding conversation graph.
//!
//! The graph is a fixed table from a trigger (the restart slash command or a
//! button `action_id`) to the ordered steps the bot sends in response. No
//! per-user position is stored: the step a user is on is implied by the button
//! they click next, and the user is recovered from the `block_id` the button
//! was rendered with.

use std::collections::BTreeMap;

use crate::blocks::{render_blocks, Button, ButtonStyle, SlackBlock};

pub const DEFAULT_RESTART_COMMAND: &str = "/eurydice-restart";

pub const ACTION_WELCOME_FINISHED: &str = "welcome_finished";
pub const ACTION_COC_AGREE: &str = "coc_agree";
pub const ACTION_COC_DISAGREE: &str = "coc_disagree";
pub const ACTION_COC_RELUCTANTLY_AGREE: &str = "coc_reluctantly_agree";
pub const ACTION_PROFILE_FINISHED: &str = "profile_finished";
pub const ACTION_CHANNEL_REC_FINISHED: &str = "channel_rec_finished";
pub const ACTION_FEEDBACK_GOOD: &str = "feedback_good";
pub const ACTION_FEEDBACK_NOT_GOOD: &str = "feedback_not_good";
pub const ACTION_FEEDBACK_HORRIBLE: &str = "feedback_horrible";

/// Feedback actions that end the flow. They intentionally have no route.
pub const TERMINAL_FEEDBACK_ACTIONS: [&str; 3] = [
    ACTION_FEEDBACK_GOOD,
    ACTION_FEEDBACK_NOT_GOOD,
    ACTION_FEEDBACK_HORRIBLE,
];

const WELCOME_TEXT: &str = "hi!! hello welcome greetings\n\
\n\
i am here to show you around <...> and <...>\n\
\n\
when you're ready, press here to continue:";

const CODE_OF_CONDUCT_TEXT: &str = "<code of conduct text>";

const COC_DISAGREE_TEXT: &str = "-_-\n\
\n\
that's okay. it also means i can't in good conscience let you in. <filler text>";

const COC_AGREED_TEXT: &str = "wonderful :tw_relieved:";
const COC_RELUCTANTLY_AGREED_TEXT: &str = "thought so :3";
const ENCOURAGE_PROFILE_TEXT: &str = "<encourage make profile text>";
const RECOMMEND_CHANNELS_TEXT: &str = "<recommend channels text>";

const COLLECT_FEEDBACK_TEXT: &str = "<collect feedback text>\n\
\n\
:ultrafastparrot: - <good feedback text>\n\
:thincc: - i'm feeling a bit confused or intimidated\n\
:fucking_sobbing: - i still feel really lost";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A message the bot can send while onboarding a user.
pub enum OnboardingStep {
    Welcome,
    CodeOfConduct,
    CocDisagree,
    CocAgreed,
    CocReluctantlyAgreed,
    EncourageProfile,
    RecommendChannels,
    CollectFeedback,
}

impl OnboardingStep {
    pub const ALL: [OnboardingStep; 8] = [
        Self::Welcome,
        Self::CodeOfConduct,
        Self::CocDisagree,
        Self::CocAgreed,
        Self::CocReluctantlyAgreed,
        Self::EncourageProfile,
        Self::RecommendChannels,
        Self::CollectFeedback,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Welcome => "welcome",
            Self::CodeOfConduct => "code_of_conduct",
            Self::CocDisagree => "coc_disagree",
            Self::CocAgreed => "coc_agreed",
            Self::CocReluctantlyAgreed => "coc_reluctantly_agreed",
            Self::EncourageProfile => "encourage_make_profile",
            Self::RecommendChannels => "recommend_channels",
            Self::CollectFeedback => "collect_feedback",
        }
    }

    pub fn text(&self) -> &'static str {
        match self {
            Self::Welcome => WELCOME_TEXT,
            Self::CodeOfConduct => CODE_OF_CONDUCT_TEXT,
            Self::CocDisagree => COC_DISAGREE_TEXT,
            Self::CocAgreed => COC_AGREED_TEXT,
            Self::CocReluctantlyAgreed => COC_RELUCTANTLY_AGREED_TEXT,
            Self::EncourageProfile => ENCOURAGE_PROFILE_TEXT,
            Self::RecommendChannels => RECOMMEND_CHANNELS_TEXT,
            Self::CollectFeedback => COLLECT_FEEDBACK_TEXT,
        }
    }

    pub fn buttons(&self) -> Vec<Button> {
        match self {
            Self::Welcome => vec![Button::new("continue", ACTION_WELCOME_FINISHED)],
            Self::CodeOfConduct => vec![
                Button::styled("i can do that!", ACTION_COC_AGREE, ButtonStyle::Primary),
                Button::new("i can't do that :V", ACTION_COC_DISAGREE),
            ],
            Self::CocDisagree => vec![Button::new("nvm maybe i can", ACTION_COC_RELUCTANTLY_AGREE)],
            Self::CocAgreed | Self::CocReluctantlyAgreed => Vec::new(),
            Self::EncourageProfile => vec![Button::new("i've done it", ACTION_PROFILE_FINISHED)],
            Self::RecommendChannels => {
                vec![Button::new("<button text>", ACTION_CHANNEL_REC_FINISHED)]
            }
            Self::CollectFeedback => vec![
                Button::new(":ultrafastparrot:", ACTION_FEEDBACK_GOOD),
                Button::new(":thincc:", ACTION_FEEDBACK_NOT_GOOD),
                Button::new(":fucking_sobbing:", ACTION_FEEDBACK_HORRIBLE),
            ],
        }
    }

    /// Renders this step for `user_id`, who is also the correlation id.
    pub fn render(&self, user_id: &str) -> Vec<SlackBlock> {
        render_blocks(self.text(), &self.buttons(), user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Event identity that selects a route in the [`FlowGraph`].
pub enum FlowTrigger {
    Command(String),
    Action(String),
}

impl FlowTrigger {
    pub fn command(name: impl Into<String>) -> Self {
        Self::Command(name.into())
    }

    pub fn action(action_id: impl Into<String>) -> Self {
        Self::Action(action_id.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Immutable trigger-to-steps table, built once at startup.
pub struct FlowGraph {
    routes: BTreeMap<FlowTrigger, Vec<OnboardingStep>>,
}

impl FlowGraph {
    /// Builds the onboarding script, entered through `restart_command`.
    pub fn standard(restart_command: &str) -> Self {
        let routes = BTreeMap::from([
            (
                FlowTrigger::command(restart_command),
                vec![OnboardingStep::Welcome],
            ),
            (
                FlowTrigger::action(ACTION_WELCOME_FINISHED),
                vec![OnboardingStep::CodeOfConduct],
            ),
            (
                FlowTrigger::action(ACTION_COC_DISAGREE),
                vec![OnboardingStep::CocDisagree],
            ),
            (
                FlowTrigger::action(ACTION_COC_AGREE),
                vec![OnboardingStep::CocAgreed, OnboardingStep::EncourageProfile],
            ),
            (
                FlowTrigger::action(ACTION_COC_RELUCTANTLY_AGREE),
                vec![
                    OnboardingStep::CocReluctantlyAgreed,
                    OnboardingStep::EncourageProfile,
                ],
            ),
            (
                FlowTrigger::action(ACTION_PROFILE_FINISHED),
                vec![OnboardingStep::RecommendChannels],
            ),
            (
                FlowTrigger::action(ACTION_CHANNEL_REC_FINISHED),
                vec![OnboardingStep::CollectFeedback],
            ),
        ]);
        Self { routes }
    }

    pub fn route(&self, trigger: &FlowTrigger) -> Option<&[OnboardingStep]> {
        self.routes.get(trigger).map(Vec::as_slice)
    }

    /// Renders every message of the route for `trigger`, in send order.
    ///
    /// Returns an empty list when nothing is routed for `trigger`.
    pub fn render_route(&self, trigger: &FlowTrigger, user_id: &str) -> Vec<Vec<SlackBlock>> {
        self.route(trigger)
            .unwrap_or_default()
            .iter()
            .map(|step| step.render(user_id))
            .collect()
    }

    pub fn triggers(&self) -> impl Iterator<Item = &FlowTrigger> {
        self.routes.keys()
    }
}

impl Default for FlowGraph {
    fn default() -> Self {
        Self::standard(DEFAULT_RESTART_COMMAND)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::blocks::{SlackBlock, SlackBlockElement, SlackTextObject};

    use super::{
        FlowGraph, FlowTrigger, OnboardingStep, ACTION_CHANNEL_REC_FINISHED, ACTION_COC_AGREE,
        ACTION_COC_DISAGREE, ACTION_COC_RELUCTANTLY_AGREE, ACTION_PROFILE_FINISHED,
        ACTION_WELCOME_FINISHED, CODE_OF_CONDUCT_TEXT, COC_DISAGREE_TEXT, DEFAULT_RESTART_COMMAND,
        RECOMMEND_CHANNELS_TEXT, TERMINAL_FEEDBACK_ACTIONS,
    };

    fn render_action_route(action_id: &str) -> Value {
        let messages = FlowGraph::default().render_route(&FlowTrigger::action(action_id), "U1");
        serde_json::to_value(messages).expect("serialize route")
    }

    fn section_text(blocks: &[SlackBlock]) -> &str {
        match &blocks[0] {
            SlackBlock::Section {
                text: SlackTextObject::Mrkdwn { text },
            } => text,
            other => panic!("expected mrkdwn section, got {other:?}"),
        }
    }

    fn button_actions(blocks: &[SlackBlock]) -> Vec<&str> {
        match blocks.get(1) {
            Some(SlackBlock::Actions { elements, .. }) => elements
                .iter()
                .map(|element| match element {
                    SlackBlockElement::Button { action_id, .. } => action_id.as_str(),
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn functional_restart_command_sends_welcome_with_continue_button() {
        let graph = FlowGraph::default();
        let messages = graph.render_route(&FlowTrigger::command(DEFAULT_RESTART_COMMAND), "U1");
        assert_eq!(messages.len(), 1);
        assert!(section_text(&messages[0]).starts_with("hi!! hello"));
        assert_eq!(button_actions(&messages[0]), vec![ACTION_WELCOME_FINISHED]);
        assert_eq!(messages[0][1].correlation_id(), Some("U1"));
    }

    #[test]
    fn functional_welcome_finished_sends_code_of_conduct_with_styled_agree_button() {
        assert_eq!(
            render_action_route(ACTION_WELCOME_FINISHED),
            json!([[
                {
                    "type": "section",
                    "text": {"type": "mrkdwn", "text": CODE_OF_CONDUCT_TEXT}
                },
                {
                    "type": "actions",
                    "elements": [
                        {
                            "type": "button",
                            "text": {"type": "plain_text", "text": "i can do that!"},
                            "action_id": "coc_agree",
                            "style": "primary"
                        },
                        {
                            "type": "button",
                            "text": {"type": "plain_text", "text": "i can't do that :V"},
                            "action_id": "coc_disagree"
                        }
                    ],
                    "block_id": "U1"
                }
            ]])
        );
    }

    #[test]
    fn functional_coc_disagree_offers_reluctant_agreement() {
        assert_eq!(
            render_action_route(ACTION_COC_DISAGREE),
            json!([[
                {
                    "type": "section",
                    "text": {"type": "mrkdwn", "text": COC_DISAGREE_TEXT}
                },
                {
                    "type": "actions",
                    "elements": [{
                        "type": "button",
                        "text": {"type": "plain_text", "text": "nvm maybe i can"},
                        "action_id": "coc_reluctantly_agree"
                    }],
                    "block_id": "U1"
                }
            ]])
        );
        assert!(COC_DISAGREE_TEXT.starts_with("-_-"));
    }

    #[test]
    fn functional_profile_finished_recommends_channels_with_single_button() {
        assert_eq!(
            render_action_route(ACTION_PROFILE_FINISHED),
            json!([[
                {
                    "type": "section",
                    "text": {"type": "mrkdwn", "text": RECOMMEND_CHANNELS_TEXT}
                },
                {
                    "type": "actions",
                    "elements": [{
                        "type": "button",
                        "text": {"type": "plain_text", "text": "<button text>"},
                        "action_id": "channel_rec_finished"
                    }],
                    "block_id": "U1"
                }
            ]])
        );
    }

    #[test]
    fn functional_coc_agree_sends_acknowledgement_then_profile_prompt() {
        let graph = FlowGraph::default();
        let messages = graph.render_route(&FlowTrigger::action(ACTION_COC_AGREE), "U1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].len(), 1);
        assert_eq!(section_text(&messages[0]), "wonderful :tw_relieved:");
        assert_eq!(
            section_text(&messages[1]),
            OnboardingStep::EncourageProfile.text()
        );
        assert_eq!(button_actions(&messages[1]), vec![ACTION_PROFILE_FINISHED]);
    }

    #[test]
    fn functional_reluctant_agreement_rejoins_profile_prompt() {
        let graph = FlowGraph::default();
        let route = graph
            .route(&FlowTrigger::action(ACTION_COC_RELUCTANTLY_AGREE))
            .expect("route");
        assert_eq!(
            route,
            &[
                OnboardingStep::CocReluctantlyAgreed,
                OnboardingStep::EncourageProfile
            ]
        );
    }

    #[test]
    fn functional_channel_recommendation_finish_offers_three_feedback_buttons() {
        let graph = FlowGraph::default();
        let messages = graph.render_route(&FlowTrigger::action(ACTION_CHANNEL_REC_FINISHED), "U1");
        assert_eq!(messages.len(), 1);
        assert_eq!(button_actions(&messages[0]), TERMINAL_FEEDBACK_ACTIONS.to_vec());
    }

    #[test]
    fn regression_feedback_actions_are_unrouted() {
        let graph = FlowGraph::default();
        for action in TERMINAL_FEEDBACK_ACTIONS {
            assert!(graph.route(&FlowTrigger::action(action)).is_none());
            assert!(graph
                .render_route(&FlowTrigger::action(action), "U1")
                .is_empty());
        }
        assert!(graph
            .route(&FlowTrigger::command("/something-else"))
            .is_none());
    }

    #[test]
    fn unit_every_button_leads_to_a_route_or_terminal_feedback() {
        let graph = FlowGraph::default();
        for step in OnboardingStep::ALL {
            for button in step.buttons() {
                let action = button.action_id();
                let routed = graph.route(&FlowTrigger::action(action)).is_some();
                assert!(
                    routed || TERMINAL_FEEDBACK_ACTIONS.contains(&action),
                    "step {} has dangling action {action}",
                    step.as_str()
                );
            }
        }
    }

    #[test]
    fn unit_rendered_routes_tag_every_actions_block_with_user_id() {
        let graph = FlowGraph::standard("/custom-restart");
        let triggers = graph.triggers().cloned().collect::<Vec<_>>();
        assert_eq!(triggers.len(), 7);
        assert!(triggers.contains(&FlowTrigger::command("/custom-restart")));
        for trigger in triggers {
            for blocks in graph.render_route(&trigger, "U77") {
                for block in blocks.iter().skip(1) {
                    assert_eq!(block.correlation_id(), Some("U77"));
                }
            }
        }
    }
}
