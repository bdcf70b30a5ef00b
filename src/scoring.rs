//! Hand scoring
//!
//! Pure functions: no I/O, no shared state.

use crate::game::{Claim, HandRecord, Totals};
use thiserror::Error;

/// Points available in a single hand
pub const HAND_POINTS: i32 = 165;
/// Highest opponent score that can be entered
pub const MAX_OPPONENT_SCORE: i32 = 160;
/// Opponent scores at or above this cost the trump team double
pub const DOUBLE_PENALTY_THRESHOLD: i32 = 85;
/// Every score and bid moves in steps of this many points
pub const BID_STEP: i32 = 5;
pub const MIN_BID: i32 = 100;
pub const MAX_BID: i32 = 160;
pub const SLAM_POINTS: i32 = HAND_POINTS;
pub const DOUBLE_SLAM_POINTS: i32 = 2 * HAND_POINTS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ScoreError {
    #[error("opponent score {0} must be a multiple of 5 between 0 and 160")]
    InvalidScoreInput(i32),
    #[error("hand has no trump team, claim or computed score")]
    HandNotScored,
    #[error("no hand is in progress")]
    NoHandInProgress,
}

/// Check an opponent score against the allowed range and step
pub fn validate_opponent_score(opponent_score: i32) -> Result<i32, ScoreError> {
    if (0..=MAX_OPPONENT_SCORE).contains(&opponent_score) && opponent_score % BID_STEP == 0 {
        Ok(opponent_score)
    } else {
        Err(ScoreError::InvalidScoreInput(opponent_score))
    }
}

/// Score earned by the trump team for a hand.
///
/// A clean sweep (opponents scored nothing) doubles the claim; opponents
/// reaching [`DOUBLE_PENALTY_THRESHOLD`] doubles the loss. Otherwise the claim
/// is won or lost depending on whether the points left to the trump team
/// cover it.
pub fn compute_hand_score(claim: Claim, opponent_score: i32) -> Result<i32, ScoreError> {
    let opponent_score = validate_opponent_score(opponent_score)?;
    let claim = claim.points();

    if opponent_score == 0 {
        return Ok(2 * claim);
    }
    if opponent_score >= DOUBLE_PENALTY_THRESHOLD {
        return Ok(-2 * claim);
    }

    let remaining = HAND_POINTS - opponent_score;
    if remaining >= claim {
        Ok(claim)
    } else {
        Ok(-claim)
    }
}

/// Credit a scored hand to the running totals.
///
/// The trump team receives its signed score, the opponents their raw points.
/// Must run exactly once per hand; an unscored hand is rejected and the totals
/// are left alone. Totals saturate rather than overflow.
pub fn apply_hand_to_totals(totals: &mut Totals, hand: &HandRecord) -> Result<(), ScoreError> {
    let (Some(trump_team), Some(trump_score), Some(opponent_score)) =
        (hand.trump_team, hand.trump_score, hand.opponent_score)
    else {
        return Err(ScoreError::HandNotScored);
    };

    totals.credit(trump_team, trump_score);
    totals.credit(trump_team.opponent(), opponent_score);
    Ok(())
}
