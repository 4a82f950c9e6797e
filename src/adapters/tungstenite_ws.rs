//! Tungstenite-based WebSocket connector.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::connect_async;
use tracing::debug;

use crate::traits::{WsConnector, WsError, WsTransport};

/// Production [`WsConnector`] backed by tokio-tungstenite.
#[derive(Debug, Clone, Copy, Default)]
pub struct TungsteniteConnector;

impl TungsteniteConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WsConnector for TungsteniteConnector {
    async fn connect(&self, url: &str) -> Result<WsTransport, WsError> {
        // The query string carries the credential; keep it out of the logs.
        let endpoint = url.split('?').next().unwrap_or(url);
        debug!("Connecting to WebSocket at {}", endpoint);

        let (ws_stream, response) = connect_async(url)
            .await
            .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;
        debug!(
            "WebSocket handshake with {} completed: {}",
            endpoint,
            response.status()
        );

        let (sink, stream) = ws_stream.split();
        let sink = sink.sink_map_err(|e| WsError::SendFailed(e.to_string()));
        let stream = stream.map(|frame| frame.map_err(|e| WsError::Protocol(e.to_string())));

        Ok(WsTransport::new(Box::pin(sink), Box::pin(stream)))
    }
}
