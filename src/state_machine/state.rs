//! Conversation state types

use serde::{Deserialize, Serialize};

/// Position of a conversation in the input-collection workflow
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConvState {
    /// Fresh conversation, waiting for the user to begin
    #[default]
    Start,
    /// Totals shown; next input starts a new hand
    AwaitNewHandAck,
    SelectTrumpTeam,
    SelectClaim,
    AwaitOpponentScore,
    /// Session model disagrees with its state; only a restart recovers
    Error { message: String },
}

impl ConvState {
    /// Short name for logs
    pub fn name(&self) -> &'static str {
        match self {
            ConvState::Start => "start",
            ConvState::AwaitNewHandAck => "await_new_hand_ack",
            ConvState::SelectTrumpTeam => "select_trump_team",
            ConvState::SelectClaim => "select_claim",
            ConvState::AwaitOpponentScore => "await_opponent_score",
            ConvState::Error { .. } => "error",
        }
    }

    /// States that expect an unscored hand at the end of the session
    pub fn needs_hand_in_progress(&self) -> bool {
        matches!(
            self,
            ConvState::SelectTrumpTeam | ConvState::SelectClaim | ConvState::AwaitOpponentScore
        )
    }
}
