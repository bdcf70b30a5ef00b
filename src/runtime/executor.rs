//! Conversation runtime executor

use super::traits::RenderSink;
use super::Command;
use crate::game::GameSession;
use crate::presentation::render;
use crate::state_machine::{step, ConvState, Event};
use crate::ConversationId;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Single owner of one conversation's session
pub struct ConversationRuntime<K>
where
    K: RenderSink + 'static,
{
    conversation_id: ConversationId,
    session: GameSession,
    sink: Arc<K>,
    command_rx: mpsc::Receiver<Command>,
}

impl<K> ConversationRuntime<K>
where
    K: RenderSink + 'static,
{
    pub fn new(
        conversation_id: ConversationId,
        session: GameSession,
        sink: Arc<K>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            conversation_id,
            session,
            sink,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        tracing::info!(conv_id = self.conversation_id, "Starting conversation runtime");

        while let Some(command) = self.command_rx.recv().await {
            match command {
                Command::Input(event) => self.process_event(&event).await,
                Command::Snapshot(reply) => {
                    let _ = reply.send(self.session.clone());
                }
            }
        }

        tracing::info!(conv_id = self.conversation_id, "Conversation runtime stopped");
    }

    async fn process_event(&mut self, event: &Event) {
        let from = self.session.state.name();
        let was_error = matches!(self.session.state, ConvState::Error { .. });

        match step(&mut self.session, event) {
            Ok(()) => {
                tracing::debug!(
                    conv_id = self.conversation_id,
                    kind = ?event.kind,
                    from,
                    to = self.session.state.name(),
                    "Transition applied"
                );
            }
            Err(e) => {
                // Same state, same prompt
                tracing::debug!(
                    conv_id = self.conversation_id,
                    kind = ?event.kind,
                    state = from,
                    error = %e,
                    "Input rejected"
                );
            }
        }

        if let ConvState::Error { message } = &self.session.state {
            if !was_error {
                tracing::warn!(
                    conv_id = self.conversation_id,
                    message = %message,
                    "Conversation entered error state"
                );
            }
        }

        let request = render(self.conversation_id, &self.session);
        if let Err(e) = self.sink.deliver(request).await {
            tracing::error!(conv_id = self.conversation_id, error = %e, "Failed to deliver render request");
        }
    }
}
