//! Conversation state machine
//!
//! Pure transitions in the Elm style: `transition` reads a session and an
//! inbound event and returns the next state plus the model mutations to apply.
//! Nothing here blocks or awaits.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;


pub use effect::Effect;
pub use event::{Event, InboundEvent, InputKind};
pub use state::ConvState;
pub use transition::{transition, TransitionError, TransitionResult};

use crate::game::GameSession;

/// Run one event through the machine and apply the outcome to the session.
///
/// Rejected input leaves the session untouched; the caller re-renders the
/// current prompt.
pub fn step(session: &mut GameSession, event: &Event) -> Result<(), TransitionError> {
    let result = transition(session, event)?;
    session.apply(result);
    Ok(())
}
