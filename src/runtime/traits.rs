//! Trait abstractions for runtime I/O
//!
//! The transport side of the process implements [`RenderSink`]; tests swap in
//! recording mocks.

use crate::presentation::RenderRequest;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("render sink is closed")]
    Closed,
    #[error("failed to encode render request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write render request: {0}")]
    Io(#[from] std::io::Error),
}

/// Receiver of render requests, usually the chat transport
#[async_trait]
pub trait RenderSink: Send + Sync {
    async fn deliver(&self, request: RenderRequest) -> Result<(), SinkError>;
}

#[async_trait]
impl<T: RenderSink + ?Sized> RenderSink for Arc<T> {
    async fn deliver(&self, request: RenderRequest) -> Result<(), SinkError> {
        (**self).deliver(request).await
    }
}

/// Writes each render request as one line of JSON
pub struct JsonLinesSink<W> {
    writer: Mutex<W>,
}

impl<W> JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl JsonLinesSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> RenderSink for JsonLinesSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn deliver(&self, request: RenderRequest) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(&request)?;
        line.push(b'\n');

        // One lock per line so concurrent conversations never interleave output
        let mut writer = self.writer.lock().await;
        writer.write_all(&line).await?;
        writer.flush().await?;
        Ok(())
    }
}
