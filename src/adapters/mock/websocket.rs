//! Scripted WebSocket connector for testing.
//!
//! [`MockConnector`] answers each connection attempt with the next scripted
//! [`ConnectOutcome`] and records when it was made. Accepted connections hand
//! the test a [`MockPeer`] playing the server side.

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::{SinkExt, StreamExt};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::Instant;
use tokio_tungstenite::tungstenite::Message;

use crate::traits::{WsConnector, WsError, WsTransport};

/// How the mock answers a connection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectOutcome {
    Accept,
    Refuse(String),
}

/// A connection attempt seen by the mock.
#[derive(Debug, Clone)]
pub struct ConnectAttempt {
    pub url: String,
    /// Tokio clock time, so paused-time tests can check spacing
    pub at: Instant,
}

struct ConnectorState {
    script: VecDeque<ConnectOutcome>,
    fallback: ConnectOutcome,
    attempts: Vec<ConnectAttempt>,
}

/// Scripted [`WsConnector`].
#[derive(Clone)]
pub struct MockConnector {
    state: Arc<Mutex<ConnectorState>>,
    peers_tx: tokio::sync::mpsc::UnboundedSender<MockPeer>,
    peers_rx: Arc<AsyncMutex<tokio::sync::mpsc::UnboundedReceiver<MockPeer>>>,
}

impl MockConnector {
    /// Connector that accepts every attempt unless scripted otherwise.
    pub fn new() -> Self {
        Self::with_fallback(ConnectOutcome::Accept)
    }

    /// Connector that refuses every attempt unless scripted otherwise.
    pub fn refusing() -> Self {
        Self::with_fallback(ConnectOutcome::Refuse("connection refused".to_string()))
    }

    fn with_fallback(fallback: ConnectOutcome) -> Self {
        let (peers_tx, peers_rx) = tokio::sync::mpsc::unbounded_channel();
        Self {
            state: Arc::new(Mutex::new(ConnectorState {
                script: VecDeque::new(),
                fallback,
                attempts: Vec::new(),
            })),
            peers_tx,
            peers_rx: Arc::new(AsyncMutex::new(peers_rx)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ConnectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the outcome of the next unscripted attempt.
    pub fn push_outcome(&self, outcome: ConnectOutcome) {
        self.lock().script.push_back(outcome);
    }

    pub fn attempts(&self) -> Vec<ConnectAttempt> {
        self.lock().attempts.clone()
    }

    pub fn attempt_count(&self) -> usize {
        self.lock().attempts.len()
    }

    /// Wait for the server side of the next accepted connection.
    pub async fn next_peer(&self) -> Option<MockPeer> {
        self.peers_rx.lock().await.recv().await
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WsConnector for MockConnector {
    async fn connect(&self, url: &str) -> Result<WsTransport, WsError> {
        let outcome = {
            let mut state = self.lock();
            state.attempts.push(ConnectAttempt {
                url: url.to_string(),
                at: Instant::now(),
            });
            let fallback = state.fallback.clone();
            state.script.pop_front().unwrap_or(fallback)
        };

        match outcome {
            ConnectOutcome::Refuse(reason) => Err(WsError::ConnectionFailed(reason)),
            ConnectOutcome::Accept => {
                let (client_tx, server_rx) = unbounded::<Message>();
                let (server_tx, client_rx) = unbounded::<Result<Message, WsError>>();

                let _ = self.peers_tx.send(MockPeer {
                    to_client: server_tx,
                    from_client: server_rx,
                });

                let sink = client_tx.sink_map_err(|e| WsError::SendFailed(e.to_string()));
                Ok(WsTransport::new(Box::pin(sink), Box::pin(client_rx)))
            }
        }
    }
}

/// Server side of an accepted mock connection.
///
/// Dropping the peer ends the client's stream, which the client sees as the
/// server going away.
pub struct MockPeer {
    to_client: UnboundedSender<Result<Message, WsError>>,
    from_client: UnboundedReceiver<Message>,
}

impl MockPeer {
    pub fn send_text(&self, text: impl Into<String>) {
        let _ = self.to_client.unbounded_send(Ok(Message::Text(text.into())));
    }

    /// Deliver a transport error to the client.
    pub fn send_error(&self, error: WsError) {
        let _ = self.to_client.unbounded_send(Err(error));
    }

    /// Start the closing handshake but keep the connection up.
    pub fn send_close(&self) {
        let _ = self.to_client.unbounded_send(Ok(Message::Close(None)));
    }

    /// Send a close frame and hang up.
    pub fn close(self) {
        self.send_close();
    }

    /// Next frame from the client; `None` once the client closed its side.
    pub async fn recv(&mut self) -> Option<Message> {
        self.from_client.next().await
    }

    /// Next text frame from the client, skipping anything else.
    pub async fn recv_text(&mut self) -> Option<String> {
        while let Some(message) = self.recv().await {
            if let Message::Text(text) = message {
                return Some(text);
            }
        }
        None
    }

    /// Frames already sent by the client, without waiting.
    pub fn drain(&mut self) -> Vec<Message> {
        let mut frames = Vec::new();
        while let Ok(Some(message)) = self.from_client.try_next() {
            frames.push(message);
        }
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let connector = MockConnector::new();
        connector.push_outcome(ConnectOutcome::Refuse("nope".to_string()));

        assert!(matches!(
            connector.connect("ws://a").await,
            Err(WsError::ConnectionFailed(reason)) if reason == "nope"
        ));
        assert!(connector.connect("ws://a").await.is_ok());
        assert_eq!(connector.attempt_count(), 2);
    }

    #[tokio::test]
    async fn test_peer_exchanges_frames() {
        let connector = MockConnector::new();
        let WsTransport {
            mut sink,
            mut stream,
        } = connector.connect("ws://a").await.unwrap();
        let mut peer = connector.next_peer().await.unwrap();

        sink.send(Message::Text("hello".to_string())).await.unwrap();
        assert_eq!(peer.recv_text().await.as_deref(), Some("hello"));

        peer.send_text("world");
        assert!(matches!(stream.next().await, Some(Ok(Message::Text(t))) if t == "world"));

        drop(peer);
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_refusing_connector() {
        let connector = MockConnector::refusing();
        assert!(connector.connect("ws://a").await.is_err());
        assert_eq!(connector.attempts()[0].url, "ws://a");
    }
}
