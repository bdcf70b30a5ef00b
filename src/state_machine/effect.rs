//! Effects produced by state transitions

use crate::game::{Claim, Team};

/// Model mutations to be applied after a transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Append a fresh, empty hand record
    BeginHand,

    SetTrumpTeam(Team),

    SetClaim(Claim),

    /// Store the opponents' points together with the derived trump score
    RecordOpponentScore { opponent_score: i32, trump_score: i32 },

    /// Credit the hand just scored to the running totals
    UpdateTotals,

    /// Drop every hand and total and start a new game
    Restart,
}
