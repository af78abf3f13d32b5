//! Output sinks - where the runner writes progress and captured output
//!
//! The runner is the only producer. A [`ChannelSink`] hands its chunks to a
//! single consumer holding the matching [`OutputStream`], which relays them
//! to whatever transport the caller uses (stdout, an HTTP body, a log).
//! [`MemorySink`] keeps everything in memory.

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

/// Default number of chunks buffered between producer and consumer
pub const DEFAULT_CAPACITY: usize = 16;

/// How a sink was closed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SinkClose {
    /// The pipeline finished every step
    Normal,
    /// A step failed and an error line was written
    AfterError,
}

/// Append-only ordered text stream written by the runner
#[async_trait]
pub trait OutputSink: Send {
    /// Append a chunk
    async fn write(&mut self, chunk: String);

    /// Close the sink; later writes are dropped
    async fn close(&mut self, state: SinkClose);
}

/// Message carried from a [`ChannelSink`] to its [`OutputStream`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkMessage {
    Chunk(String),
    Closed(SinkClose),
}

/// Create a connected sink/stream pair holding at most `capacity` chunks
pub fn channel(capacity: usize) -> (ChannelSink, OutputStream) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        ChannelSink { tx: Some(tx) },
        OutputStream {
            rx,
            closed: None,
        },
    )
}

/// Producer half of the progress channel
///
/// Writes wait while the channel is full. If the consumer goes away the
/// writes become no-ops; the run itself is not interrupted.
#[derive(Debug)]
pub struct ChannelSink {
    tx: Option<mpsc::Sender<SinkMessage>>,
}

impl ChannelSink {
    async fn send(&mut self, message: SinkMessage) {
        let disconnected = match &self.tx {
            Some(tx) => tx.send(message).await.is_err(),
            None => false,
        };
        if disconnected {
            debug!("Output consumer disconnected, discarding further output");
            self.tx = None;
        }
    }
}

#[async_trait]
impl OutputSink for ChannelSink {
    async fn write(&mut self, chunk: String) {
        self.send(SinkMessage::Chunk(chunk)).await;
    }

    async fn close(&mut self, state: SinkClose) {
        self.send(SinkMessage::Closed(state)).await;
        self.tx = None;
    }
}

/// Consumer half of the progress channel
#[derive(Debug)]
pub struct OutputStream {
    rx: mpsc::Receiver<SinkMessage>,
    closed: Option<SinkClose>,
}

impl OutputStream {
    /// Next chunk, or `None` once the sink is closed or dropped
    pub async fn next_chunk(&mut self) -> Option<String> {
        if self.closed.is_some() {
            return None;
        }
        match self.rx.recv().await {
            Some(SinkMessage::Chunk(chunk)) => Some(chunk),
            Some(SinkMessage::Closed(state)) => {
                self.closed = Some(state);
                None
            }
            None => None,
        }
    }

    /// How the sink was closed; `None` while open or if it was dropped unclosed
    pub fn close_state(&self) -> Option<SinkClose> {
        self.closed
    }

    /// Drain the stream to the end
    pub async fn collect(mut self) -> Transcript {
        let mut chunks = Vec::new();
        while let Some(chunk) = self.next_chunk().await {
            chunks.push(chunk);
        }
        Transcript {
            chunks,
            close: self.closed,
        }
    }
}

/// Everything a consumer received from one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub chunks: Vec<String>,
    pub close: Option<SinkClose>,
}

impl Transcript {
    /// All chunks concatenated
    pub fn text(&self) -> String {
        self.chunks.concat()
    }
}

/// Sink that records chunks in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    chunks: Vec<String>,
    closed: Option<SinkClose>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        self.chunks.concat()
    }

    pub fn close_state(&self) -> Option<SinkClose> {
        self.closed
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&mut self, chunk: String) {
        if self.closed.is_none() {
            self.chunks.push(chunk);
        }
    }

    async fn close(&mut self, state: SinkClose) {
        self.closed.get_or_insert(state);
    }
}
