//! Runtime for conversations
//!
//! Each conversation id gets one task that owns its [`GameSession`] and
//! drains a bounded mailbox, so inputs for a chat are handled strictly in
//! arrival order while different chats proceed independently.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::ConversationRuntime;
pub use traits::*;

use crate::config::BotConfig;
use crate::game::GameSession;
use crate::state_machine::{Event, InboundEvent};
use crate::ConversationId;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, RwLock};

/// Messages understood by a conversation task
#[derive(Debug)]
pub enum Command {
    /// A user input to run through the state machine
    Input(Event),
    /// Request a copy of the current session
    Snapshot(oneshot::Sender<GameSession>),
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("conversation {0} is no longer running")]
    ConversationStopped(ConversationId),
}

/// Handle to interact with a running conversation
#[derive(Debug, Clone)]
pub struct ConversationHandle {
    pub command_tx: mpsc::Sender<Command>,
}

impl ConversationHandle {
    fn is_running(&self) -> bool {
        !self.command_tx.is_closed()
    }
}

/// Owner of every conversation runtime in the process
pub struct SessionManager<K: RenderSink + 'static> {
    sink: Arc<K>,
    mailbox_capacity: usize,
    runtimes: RwLock<HashMap<ConversationId, ConversationHandle>>,
}

impl<K: RenderSink + 'static> SessionManager<K> {
    pub fn new(sink: Arc<K>, config: &BotConfig) -> Self {
        Self {
            sink,
            mailbox_capacity: config.mailbox_capacity.max(1),
            runtimes: RwLock::new(HashMap::new()),
        }
    }

    /// Get the runtime for a conversation, starting one on first contact
    pub async fn get_or_create(&self, conversation_id: ConversationId) -> ConversationHandle {
        {
            let runtimes = self.runtimes.read().await;
            if let Some(handle) = runtimes.get(&conversation_id).filter(|h| h.is_running()) {
                return handle.clone();
            }
        }

        let mut runtimes = self.runtimes.write().await;
        // Another caller may have started it between the two locks
        if let Some(handle) = runtimes.get(&conversation_id).filter(|h| h.is_running()) {
            return handle.clone();
        }

        let (command_tx, command_rx) = mpsc::channel(self.mailbox_capacity);
        let runtime = ConversationRuntime::new(
            conversation_id,
            GameSession::new(),
            self.sink.clone(),
            command_rx,
        );

        tokio::spawn(async move {
            runtime.run().await;
            tracing::info!(conv_id = conversation_id, "Conversation runtime finished");
        });

        let handle = ConversationHandle { command_tx };
        runtimes.insert(conversation_id, handle.clone());
        handle
    }

    /// Queue a user input for its conversation.
    ///
    /// The render request produced by the input is handed to the sink by the
    /// conversation task.
    pub async fn dispatch(&self, inbound: InboundEvent) -> Result<(), RuntimeError> {
        let conversation_id = inbound.conversation_id;
        let handle = self.get_or_create(conversation_id).await;
        handle
            .command_tx
            .send(Command::Input(inbound.event))
            .await
            .map_err(|_| RuntimeError::ConversationStopped(conversation_id))
    }

    /// Copy of a conversation's session, after every input queued before this call.
    ///
    /// Returns `None` for conversations that have never been seen.
    pub async fn snapshot(&self, conversation_id: ConversationId) -> Option<GameSession> {
        let handle = self.runtimes.read().await.get(&conversation_id).cloned()?;
        let (reply_tx, reply_rx) = oneshot::channel();
        handle
            .command_tx
            .send(Command::Snapshot(reply_tx))
            .await
            .ok()?;
        reply_rx.await.ok()
    }

    pub async fn conversation_count(&self) -> usize {
        self.runtimes.read().await.len()
    }
}
