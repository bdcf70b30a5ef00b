//! Hokm scorekeeper - console transport
//!
//! Reads user inputs from stdin, one per line, either as JSON
//! (`{"conversation_id": 1, "kind": "selection", "payload": "begin"}`) or as
//! `<conversation_id> <payload>`, and writes every render request to stdout as
//! a line of JSON. Logs go to stderr.

use hokm_scorer::config::{BotConfig, LogFormat};
use hokm_scorer::runtime::JsonLinesSink;
use hokm_scorer::{Event, InboundEvent, SessionManager};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::from_env()?;

    // Initialize logging
    let fmt_layer = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_new(&config.log_filter)?)
        .with(fmt_layer)
        .init();

    tracing::info!(
        mailbox_capacity = config.mailbox_capacity,
        "Hokm scorekeeper reading from stdin"
    );

    let manager = SessionManager::new(Arc::new(JsonLinesSink::stdout()), &config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let Some(inbound) = parse_line(&line) else {
            tracing::warn!(line = %line, "Ignoring malformed input line");
            continue;
        };
        if let Err(e) = manager.dispatch(inbound).await {
            tracing::error!(error = %e, "Failed to dispatch input");
        }
    }

    tracing::info!(
        conversations = manager.conversation_count().await,
        "Input closed, shutting down"
    );
    Ok(())
}

/// Parse one input line; JSON objects first, then `<id> <payload>`
fn parse_line(line: &str) -> Option<InboundEvent> {
    let line = line.trim();
    if line.starts_with('{') {
        return serde_json::from_str(line).ok();
    }

    let (id, payload) = line.split_once(char::is_whitespace)?;
    let conversation_id = id.parse().ok()?;
    Some(InboundEvent::new(conversation_id, Event::text(payload.trim())))
}
