//! Hokm scorekeeper
//!
//! Per-conversation scoring for Hokm: a chat transport feeds user inputs in,
//! the state machine collects trump team, claim and opponent points for each
//! hand, and the running totals for both teams are rendered back as prompts.

pub mod config;
pub mod game;
pub mod presentation;
pub mod runtime;
pub mod scoring;
pub mod state_machine;

/// Identifier of a chat, as assigned by the transport
pub type ConversationId = i64;

pub use config::BotConfig;
pub use game::{Claim, GameSession, HandRecord, Team, Totals};
pub use presentation::{RenderOption, RenderRequest};
pub use runtime::{RenderSink, SessionManager};
pub use state_machine::{ConvState, Event, InboundEvent, InputKind};
