//! WebSocket transport trait abstraction.
//!
//! [`WsConnector`] opens one physical connection and hands back its two
//! halves. Everything above it (heartbeat, reconnect, fan-out) is written
//! against these boxed halves, so tests can drive the socket with in-memory
//! channels instead of a server.

use async_trait::async_trait;
use futures::{Sink, Stream};
use std::pin::Pin;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Message;

/// WebSocket errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WsError {
    /// Connection could not be established
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    /// Disconnected from server
    #[error("Disconnected from server")]
    Disconnected,
    /// Failed to send a frame
    #[error("Send failed: {0}")]
    SendFailed(String),
    /// The peer violated the protocol or the stream broke mid-frame
    #[error("Protocol error: {0}")]
    Protocol(String),
    /// No credential available to authenticate the connection
    #[error("No credential available; sign in first")]
    MissingCredential,
}

/// Outbound half of a connection.
pub type FrameSink = Pin<Box<dyn Sink<Message, Error = WsError> + Send>>;

/// Inbound half of a connection.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<Message, WsError>> + Send>>;

/// An established connection, split into its halves.
pub struct WsTransport {
    pub sink: FrameSink,
    pub stream: FrameStream,
}

impl WsTransport {
    pub fn new(sink: FrameSink, stream: FrameStream) -> Self {
        Self { sink, stream }
    }
}

/// Opens WebSocket connections.
#[async_trait]
pub trait WsConnector: Send + Sync {
    /// Open a connection to `url`.
    ///
    /// Resolves once the handshake completed (the transport is open) or
    /// failed.
    async fn connect(&self, url: &str) -> Result<WsTransport, WsError>;
}
