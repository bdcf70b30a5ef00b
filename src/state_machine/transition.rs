//! Pure state transition function

use super::{ConvState, Effect, Event};
use crate::game::{Claim, ClaimError, GameSession, Team};
use crate::scoring::compute_hand_score;
use thiserror::Error;

/// Payloads that leave the greeting or restart after an error
const BEGIN_TAGS: [&str; 2] = ["begin", "/start"];

/// Result of a state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ConvState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ConvState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Input the current state cannot accept.
///
/// None of these are fatal: the session is left as it was and the same prompt
/// is shown again.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("expected the begin command, got {0:?}")]
    ExpectedBegin(String),
    #[error("unknown team {0:?}")]
    UnknownTeam(String),
    #[error("not a number: {0:?}")]
    UnparseableNumericInput(String),
    #[error("claim {0} is not on the bidding ladder")]
    InvalidClaim(i32),
    #[error("opponent score {0} must be a multiple of 5 between 0 and 160")]
    InvalidScoreInput(i32),
}

impl From<ClaimError> for TransitionError {
    fn from(err: ClaimError) -> Self {
        match err {
            ClaimError::Unparseable(text) => TransitionError::UnparseableNumericInput(text),
            ClaimError::OutOfRange(points) => TransitionError::InvalidClaim(points),
        }
    }
}

fn is_begin(payload: &str) -> bool {
    BEGIN_TAGS.iter().any(|tag| payload.eq_ignore_ascii_case(tag))
}

fn corrupted(state: &ConvState, detail: &str) -> TransitionResult {
    TransitionResult::new(ConvState::Error {
        message: format!("{detail} while in {}", state.name()),
    })
}

/// Pure transition function.
///
/// Given the same session and event this always returns the same result and
/// performs no I/O.
pub fn transition(session: &GameSession, event: &Event) -> Result<TransitionResult, TransitionError> {
    let state = &session.state;
    let payload = event.trimmed();

    if state.needs_hand_in_progress() && session.current_hand().is_none() {
        return Ok(corrupted(state, "no hand in progress"));
    }

    match state {
        ConvState::Start => {
            if is_begin(payload) {
                Ok(TransitionResult::new(ConvState::AwaitNewHandAck))
            } else {
                Err(TransitionError::ExpectedBegin(payload.to_string()))
            }
        }

        // Any input acknowledges the totals and opens a new hand
        ConvState::AwaitNewHandAck => {
            Ok(TransitionResult::new(ConvState::SelectTrumpTeam).with_effect(Effect::BeginHand))
        }

        ConvState::SelectTrumpTeam => {
            let team = Team::from_tag(payload)
                .ok_or_else(|| TransitionError::UnknownTeam(payload.to_string()))?;
            Ok(TransitionResult::new(ConvState::SelectClaim).with_effect(Effect::SetTrumpTeam(team)))
        }

        ConvState::SelectClaim => {
            let claim: Claim = payload.parse()?;
            Ok(TransitionResult::new(ConvState::AwaitOpponentScore).with_effect(Effect::SetClaim(claim)))
        }

        ConvState::AwaitOpponentScore => {
            let opponent_score: i32 = payload
                .parse()
                .map_err(|_| TransitionError::UnparseableNumericInput(payload.to_string()))?;

            let hand = session.current_hand();
            let (Some(claim), Some(_)) = (
                hand.and_then(|hand| hand.claim),
                hand.and_then(|hand| hand.trump_team),
            ) else {
                return Ok(corrupted(state, "hand has no claim or trump team"));
            };

            let trump_score = compute_hand_score(claim, opponent_score)
                .map_err(|_| TransitionError::InvalidScoreInput(opponent_score))?;

            Ok(TransitionResult::new(ConvState::AwaitNewHandAck).with_effects([
                Effect::RecordOpponentScore {
                    opponent_score,
                    trump_score,
                },
                Effect::UpdateTotals,
            ]))
        }

        ConvState::Error { .. } => {
            if is_begin(payload) {
                Ok(TransitionResult::new(ConvState::AwaitNewHandAck).with_effect(Effect::Restart))
            } else {
                Err(TransitionError::ExpectedBegin(payload.to_string()))
            }
        }
    }
}
