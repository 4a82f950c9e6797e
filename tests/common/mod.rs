//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use linda::adapters::mock::{InMemoryCredentials, RecordingNavigator, RecordingNotifier};
use linda::adapters::ReqwestHttpClient;
use linda::config::ClientConfig;
use linda::http::ApiClient;
use linda::websocket::{InboundMessage, MessageHandler};
use tokio::sync::mpsc;

/// Token most tests sign in with.
pub const TEST_TOKEN: &str = "test-token-12345";

/// API client against a wiremock server, with recording side-effect sinks.
pub struct ApiFixture {
    pub client: ApiClient,
    pub credentials: Arc<InMemoryCredentials>,
    pub notifier: Arc<RecordingNotifier>,
    pub navigator: Arc<RecordingNavigator>,
}

impl ApiFixture {
    pub fn new(server_uri: &str, token: Option<&str>) -> Self {
        let credentials = Arc::new(match token {
            Some(token) => InMemoryCredentials::with_token(token),
            None => InMemoryCredentials::new(),
        });
        let notifier = Arc::new(RecordingNotifier::new());
        let navigator = Arc::new(RecordingNavigator::new());
        let config = ClientConfig::default()
            .with_api_base_url(format!("{}/api/linda", server_uri))
            .with_request_timeout(Duration::from_secs(5));

        let client = ApiClient::new(
            &config,
            Arc::new(ReqwestHttpClient::new()),
            credentials.clone(),
            notifier.clone(),
            navigator.clone(),
        );

        Self {
            client,
            credentials,
            notifier,
            navigator,
        }
    }
}

/// A message handler that forwards every payload into a channel.
pub fn channel_handler() -> (MessageHandler, mpsc::UnboundedReceiver<String>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handler: MessageHandler = Arc::new(move |message: &InboundMessage| {
        let _ = tx.send(message.text().to_string());
    });
    (handler, rx)
}

/// Same as [`channel_handler`], prefixing each payload with `tag`.
pub fn tagged_handler(
    tag: &'static str,
    tx: mpsc::UnboundedSender<String>,
) -> MessageHandler {
    Arc::new(move |message: &InboundMessage| {
        let _ = tx.send(format!("{}:{}", tag, message.text()));
    })
}
