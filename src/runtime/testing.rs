//! Mock sinks for testing
//!
//! These mocks enable runtime tests without a real transport.

use super::traits::{RenderSink, SinkError};
use crate::presentation::RenderRequest;
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

// ============================================================================
// Recording Sink
// ============================================================================

/// Sink that keeps every request it receives
#[derive(Default)]
pub struct RecordingSink {
    requests: Mutex<Vec<RenderRequest>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records requests but reports every delivery as failed
    pub fn failing() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl RenderSink for RecordingSink {
    async fn deliver(&self, request: RenderRequest) -> Result<(), SinkError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            Err(SinkError::Closed)
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// Channel Sink
// ============================================================================

/// Sink that forwards requests to a channel so tests can await them
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RenderRequest>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl RenderSink for ChannelSink {
    async fn deliver(&self, request: RenderRequest) -> Result<(), SinkError> {
        self.tx.send(request).map_err(|_| SinkError::Closed)
    }
}

/// Wait for the next render request with timeout
pub async fn next_render(
    rx: &mut mpsc::UnboundedReceiver<RenderRequest>,
    timeout: Duration,
) -> Option<RenderRequest> {
    tokio::time::timeout(timeout, rx.recv()).await.ok().flatten()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotConfig;
    use crate::game::{Claim, HandRecord, Team, Totals};
    use crate::runtime::SessionManager;
    use crate::state_machine::{ConvState, Event, InboundEvent};
    use std::sync::Arc;

    const WAIT: Duration = Duration::from_secs(2);

    fn manager(sink: Arc<ChannelSink>) -> SessionManager<ChannelSink> {
        SessionManager::new(sink, &BotConfig::default())
    }

    async fn send(manager: &SessionManager<ChannelSink>, id: i64, payload: &str) {
        manager
            .dispatch(InboundEvent::new(id, Event::selection(payload)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_recording_sink() {
        let sink = RecordingSink::new();
        let request = RenderRequest {
            conversation_id: 1,
            prompt_text: "hi".to_string(),
            options: vec![],
            columns: 1,
        };
        sink.deliver(request.clone()).await.unwrap();
        assert_eq!(sink.requests(), vec![request]);

        let failing = RecordingSink::failing();
        assert!(failing
            .deliver(RenderRequest {
                conversation_id: 2,
                prompt_text: String::new(),
                options: vec![],
                columns: 1,
            })
            .await
            .is_err());
    }

    /// Integration test: the full first hand through the session manager
    #[tokio::test]
    async fn test_full_hand_through_manager() {
        let (sink, mut rx) = ChannelSink::channel();
        let manager = manager(Arc::new(sink));

        for payload in ["begin", "continue", "red", "120", "60"] {
            send(&manager, 10, payload).await;
        }

        let mut last = None;
        for _ in 0..5 {
            last = next_render(&mut rx, WAIT).await;
            assert!(last.is_some());
        }
        let last = last.unwrap();
        assert!(last.prompt_text.contains("Red team: -120"));
        assert!(last.prompt_text.contains("Black team: 60"));
        assert!(last.prompt_text.contains("Red claimed 120 and scored -120"));

        let session = manager.snapshot(10).await.unwrap();
        assert_eq!(session.state, ConvState::AwaitNewHandAck);
        assert_eq!(session.totals, Totals { red: -120, black: 60 });
        assert_eq!(
            session.hands,
            vec![HandRecord {
                trump_team: Some(Team::Red),
                claim: Some(Claim::Bid(120)),
                opponent_score: Some(60),
                trump_score: Some(-120),
            }]
        );
    }

    #[tokio::test]
    async fn test_conversations_are_independent() {
        let (sink, _rx) = ChannelSink::channel();
        let manager = manager(Arc::new(sink));

        for payload in ["begin", "continue", "black", "100"] {
            send(&manager, 1, payload).await;
        }
        // Garbage in a second chat must not disturb the first
        for payload in ["begin", "continue", "purple", "abc"] {
            send(&manager, 2, payload).await;
        }
        send(&manager, 1, "0").await;

        let first = manager.snapshot(1).await.unwrap();
        assert_eq!(first.totals, Totals { red: 0, black: 200 });
        assert_eq!(first.state, ConvState::AwaitNewHandAck);

        let second = manager.snapshot(2).await.unwrap();
        assert_eq!(second.state, ConvState::SelectTrumpTeam);
        assert_eq!(second.totals, Totals::default());
        assert_eq!(second.hands, vec![HandRecord::default()]);

        assert_eq!(manager.conversation_count().await, 2);
    }

    #[tokio::test]
    async fn test_invalid_score_keeps_session() {
        let (sink, mut rx) = ChannelSink::channel();
        let manager = manager(Arc::new(sink));

        for payload in ["begin", "continue", "red", "120"] {
            send(&manager, 5, payload).await;
        }
        let before = manager.snapshot(5).await.unwrap();

        for payload in ["42", "-5", "165", "many"] {
            send(&manager, 5, payload).await;
        }
        let after = manager.snapshot(5).await.unwrap();
        assert_eq!(after, before);

        // Every rejected score repeats the opponent score prompt
        let mut renders = Vec::new();
        while let Some(request) = next_render(&mut rx, Duration::from_millis(200)).await {
            renders.push(request);
        }
        assert_eq!(renders.len(), 8);
        assert!(renders[3..].iter().all(|r| *r == renders[3]));
    }

    #[tokio::test]
    async fn test_unknown_conversation_has_no_snapshot() {
        let (sink, _rx) = ChannelSink::channel();
        let manager = manager(Arc::new(sink));
        assert!(manager.snapshot(99).await.is_none());
        assert_eq!(manager.conversation_count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_first_contact_creates_one_runtime() {
        let (sink, _rx) = ChannelSink::channel();
        let manager = Arc::new(manager(Arc::new(sink)));

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            tasks.push(tokio::spawn(async move {
                manager.get_or_create(77).await;
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(manager.conversation_count().await, 1);
        send(&manager, 77, "begin").await;
        let session = manager.snapshot(77).await.unwrap();
        assert_eq!(session.state, ConvState::AwaitNewHandAck);
    }
}
