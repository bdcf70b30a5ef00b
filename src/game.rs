//! Hand and game data model
//!
//! A [`GameSession`] is the accumulated state of one chat: where it sits in the
//! input workflow, every hand recorded so far, and the running team totals.
//! Sessions are only mutated through [`GameSession::apply`], which consumes the
//! effects produced by the pure state machine.

use crate::scoring::{self, ScoreError, BID_STEP, DOUBLE_SLAM_POINTS, MAX_BID, MIN_BID, SLAM_POINTS};
use crate::state_machine::{ConvState, Effect, TransitionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the two partnerships at the table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Red,
    Black,
}

impl Team {
    pub const ALL: [Team; 2] = [Team::Red, Team::Black];

    /// Tag echoed back by the transport when this team is selected
    pub fn tag(self) -> &'static str {
        match self {
            Team::Red => "red",
            Team::Black => "black",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Team::Red => "Red",
            Team::Black => "Black",
        }
    }

    /// Match a payload against the team tags, ignoring case and surrounding whitespace
    pub fn from_tag(payload: &str) -> Option<Team> {
        let payload = payload.trim();
        Team::ALL
            .into_iter()
            .find(|team| payload.eq_ignore_ascii_case(team.tag()))
    }

    pub fn opponent(self) -> Team {
        match self {
            Team::Red => Team::Black,
            Team::Black => Team::Red,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The number of points the trump team commits to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "points", rename_all = "snake_case")]
pub enum Claim {
    /// A regular bid in `100..=160`, multiple of 5
    Bid(i32),
    /// Every point of the hand
    Slam,
    DoubleSlam,
}

/// Why a payload was not accepted as a claim
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimError {
    #[error("claim is not a number: {0:?}")]
    Unparseable(String),
    #[error("claim {0} is not between 100 and 160 in steps of 5")]
    OutOfRange(i32),
}

impl Claim {
    pub const SLAM_TAG: &'static str = "slam";
    pub const DOUBLE_SLAM_TAG: &'static str = "double-slam";

    /// Build a regular bid, validating the ladder
    pub fn bid(points: i32) -> Result<Self, ClaimError> {
        if (MIN_BID..=MAX_BID).contains(&points) && points % BID_STEP == 0 {
            Ok(Claim::Bid(points))
        } else {
            Err(ClaimError::OutOfRange(points))
        }
    }

    /// Point value used by the scoring engine
    pub fn points(self) -> i32 {
        match self {
            Claim::Bid(points) => points,
            Claim::Slam => SLAM_POINTS,
            Claim::DoubleSlam => DOUBLE_SLAM_POINTS,
        }
    }

    pub fn tag(self) -> String {
        match self {
            Claim::Bid(points) => points.to_string(),
            Claim::Slam => Self::SLAM_TAG.to_string(),
            Claim::DoubleSlam => Self::DOUBLE_SLAM_TAG.to_string(),
        }
    }

    pub fn label(self) -> String {
        match self {
            Claim::Bid(points) => points.to_string(),
            Claim::Slam => "Slam".to_string(),
            Claim::DoubleSlam => "Double slam".to_string(),
        }
    }

    /// Every claim offered as a quick-select option, in ladder order
    pub fn ladder() -> impl Iterator<Item = Claim> {
        (MIN_BID..=MAX_BID)
            .filter(|points| points % BID_STEP == 0)
            .map(Claim::Bid)
            .chain([Claim::Slam, Claim::DoubleSlam])
    }
}

impl FromStr for Claim {
    type Err = ClaimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case(Self::SLAM_TAG) {
            return Ok(Claim::Slam);
        }
        if s.eq_ignore_ascii_case(Self::DOUBLE_SLAM_TAG) {
            return Ok(Claim::DoubleSlam);
        }
        let points: i32 = s
            .parse()
            .map_err(|_| ClaimError::Unparseable(s.to_string()))?;
        Claim::bid(points)
    }
}

impl fmt::Display for Claim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One hand, filled in field by field as the user answers prompts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRecord {
    pub trump_team: Option<Team>,
    pub claim: Option<Claim>,
    pub opponent_score: Option<i32>,
    /// Derived from `claim` and `opponent_score`; never entered directly
    pub trump_score: Option<i32>,
}

impl HandRecord {
    /// A hand is historical once its trump score has been computed
    pub fn is_scored(&self) -> bool {
        self.trump_score.is_some()
    }
}

/// Running totals for both teams
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub red: i32,
    pub black: i32,
}

impl Totals {
    pub fn for_team(&self, team: Team) -> i32 {
        match team {
            Team::Red => self.red,
            Team::Black => self.black,
        }
    }

    /// Add points to a team, saturating at the `i32` bounds
    pub fn credit(&mut self, team: Team, points: i32) {
        let total = match team {
            Team::Red => &mut self.red,
            Team::Black => &mut self.black,
        };
        *total = total.saturating_add(points);
    }

    #[cfg(test)]
    pub fn sum(&self) -> i32 {
        self.red + self.black
    }
}

/// Accumulated state of one conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub state: ConvState,
    pub hands: Vec<HandRecord>,
    pub totals: Totals,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            state: ConvState::Start,
            hands: Vec::new(),
            totals: Totals::default(),
        }
    }

    /// The hand currently being entered, if one has begun and is not yet scored
    pub fn current_hand(&self) -> Option<&HandRecord> {
        self.hands.last().filter(|hand| !hand.is_scored())
    }

    /// The most recent hand whose score has been computed
    pub fn last_scored_hand(&self) -> Option<&HandRecord> {
        self.hands.iter().rev().find(|hand| hand.is_scored())
    }

    pub fn hands_played(&self) -> usize {
        self.hands.iter().filter(|hand| hand.is_scored()).count()
    }

    /// Apply a transition: run its effects in order, then move to the new state.
    ///
    /// An effect that cannot be applied leaves the session in
    /// [`ConvState::Error`] instead of the requested state.
    pub fn apply(&mut self, result: TransitionResult) {
        for effect in result.effects {
            if let Err(e) = self.apply_effect(effect) {
                tracing::warn!(error = %e, "Effect could not be applied");
                self.state = ConvState::Error {
                    message: e.to_string(),
                };
                return;
            }
        }
        self.state = result.new_state;
    }

    fn apply_effect(&mut self, effect: Effect) -> Result<(), ScoreError> {
        match effect {
            Effect::BeginHand => {
                self.hands.push(HandRecord::default());
            }
            Effect::SetTrumpTeam(team) => {
                self.in_progress_mut()?.trump_team = Some(team);
            }
            Effect::SetClaim(claim) => {
                self.in_progress_mut()?.claim = Some(claim);
            }
            Effect::RecordOpponentScore {
                opponent_score,
                trump_score,
            } => {
                let hand = self.in_progress_mut()?;
                hand.opponent_score = Some(opponent_score);
                hand.trump_score = Some(trump_score);
            }
            Effect::UpdateTotals => {
                let hand = self.hands.last().ok_or(ScoreError::NoHandInProgress)?;
                scoring::apply_hand_to_totals(&mut self.totals, hand)?;
            }
            Effect::Restart => {
                *self = GameSession::new();
            }
        }
        Ok(())
    }

    fn in_progress_mut(&mut self) -> Result<&mut HandRecord, ScoreError> {
        self.hands
            .last_mut()
            .filter(|hand| !hand.is_scored())
            .ok_or(ScoreError::NoHandInProgress)
    }
}
