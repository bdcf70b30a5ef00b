//! Prompt selection
//!
//! Maps a conversation state to the text and options the transport should
//! show. Stateless given the session; never fails.

use crate::game::{Claim, GameSession, Team};
use crate::scoring::BID_STEP;
use crate::state_machine::ConvState;
use crate::ConversationId;
use serde::{Deserialize, Serialize};

pub const BEGIN_TAG: &str = "begin";
pub const CONTINUE_TAG: &str = "continue";
/// Highest opponent score offered as a quick-select option
pub const QUICK_SCORE_MAX: i32 = 80;

/// A selectable option. The transport echoes `value_tag` back as the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOption {
    pub label: String,
    pub value_tag: String,
}

impl RenderOption {
    pub fn new(label: impl Into<String>, value_tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value_tag: value_tag.into(),
        }
    }

    /// Option whose label is its own tag (numeric ladders)
    fn plain(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            label: tag.clone(),
            value_tag: tag,
        }
    }
}

/// What to show for a state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub options: Vec<RenderOption>,
    /// Layout hint: options per row
    pub columns: usize,
}

/// Outbound render request handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub conversation_id: ConversationId,
    pub prompt_text: String,
    pub options: Vec<RenderOption>,
    pub columns: usize,
}

pub fn render(conversation_id: ConversationId, session: &GameSession) -> RenderRequest {
    let prompt = prompt_for(&session.state, session);
    RenderRequest {
        conversation_id,
        prompt_text: prompt.text,
        options: prompt.options,
        columns: prompt.columns,
    }
}

pub fn prompt_for(state: &ConvState, session: &GameSession) -> Prompt {
    match state {
        ConvState::Start => Prompt {
            text: "Welcome to the Hokm scorekeeper. Press the button to start a new game.".to_string(),
            options: vec![RenderOption::new("Start new game", BEGIN_TAG)],
            columns: 1,
        },
        ConvState::AwaitNewHandAck => Prompt {
            text: totals_text(session),
            options: vec![RenderOption::new("Record new hand", CONTINUE_TAG)],
            columns: 1,
        },
        ConvState::SelectTrumpTeam => Prompt {
            text: "Which team holds trump?".to_string(),
            options: Team::ALL
                .into_iter()
                .map(|team| RenderOption::new(team.label(), team.tag()))
                .collect(),
            columns: 2,
        },
        ConvState::SelectClaim => Prompt {
            text: "How many points did the trump team claim?".to_string(),
            options: Claim::ladder()
                .map(|claim| RenderOption::new(claim.label(), claim.tag()))
                .collect(),
            columns: 4,
        },
        // Only the quick-select prefix is offered; any valid score may be typed
        ConvState::AwaitOpponentScore => Prompt {
            text: "How many points did the trump team's opponents take?".to_string(),
            options: (0..=QUICK_SCORE_MAX)
                .filter(|score| score % BID_STEP == 0)
                .map(|score| RenderOption::plain(score.to_string()))
                .collect(),
            columns: 9,
        },
        ConvState::Error { .. } => fallback(),
    }
}

/// Shown when the conversation cannot continue from where it is
pub fn fallback() -> Prompt {
    Prompt {
        text: "Could not process that input.".to_string(),
        options: vec![RenderOption::new("Start new game", BEGIN_TAG)],
        columns: 1,
    }
}

fn totals_text(session: &GameSession) -> String {
    let mut lines: Vec<String> = Team::ALL
        .into_iter()
        .map(|team| format!("{team} team: {}", session.totals.for_team(team)))
        .collect();

    let played = session.hands_played();
    if played > 0 {
        lines.push(format!("Hands played: {played}"));
    }
    if let Some(hand) = session.last_scored_hand() {
        if let (Some(team), Some(claim), Some(score)) =
            (hand.trump_team, hand.claim, hand.trump_score)
        {
            lines.push(format!("Last hand: {team} claimed {claim} and scored {score:+}"));
        }
    }
    lines.join("\n")
}
