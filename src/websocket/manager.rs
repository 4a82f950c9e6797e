//! Application-wide WebSocket connection.
//!
//! [`ConnectionManager`] owns the single [`HeartbeatSocket`] the app talks
//! through, attaches the stored credential to the endpoint URL, turns
//! lifecycle events into user notifications and fans inbound messages out to
//! the [`SubscriberRegistry`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, error};

use super::registry::{HandlerId, MessageHandler, SubscriberRegistry};
use super::socket::{ConnectionState, HeartbeatSocket, SocketHandlers};
use crate::config::ClientConfig;
use crate::notifications::{Notification, Notifier};
use crate::traits::{CredentialsProvider, WsConnector, WsError};

struct ManagerInner {
    config: ClientConfig,
    credentials: Arc<dyn CredentialsProvider>,
    connector: Arc<dyn WsConnector>,
    notifier: Arc<dyn Notifier>,
    registry: Arc<SubscriberRegistry>,
    socket: Mutex<Option<HeartbeatSocket>>,
}

/// Shared handle to the application's WebSocket connection.
///
/// Create one per process and clone it where needed.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<ManagerInner>,
}

impl ConnectionManager {
    pub fn new(
        config: ClientConfig,
        credentials: Arc<dyn CredentialsProvider>,
        connector: Arc<dyn WsConnector>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                config,
                credentials,
                connector,
                notifier,
                registry: Arc::new(SubscriberRegistry::new()),
                socket: Mutex::new(None),
            }),
        }
    }

    fn socket_slot(&self) -> MutexGuard<'_, Option<HeartbeatSocket>> {
        self.inner
            .socket
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn current_socket(&self) -> Option<HeartbeatSocket> {
        self.socket_slot().clone()
    }

    /// Open the application connection with the stored credential.
    ///
    /// Any previous connection is torn down first. Fails with
    /// [`WsError::MissingCredential`] when no credential is stored; nothing is
    /// opened in that case.
    pub async fn connect(&self) -> Result<(), WsError> {
        let Some(token) = self.inner.credentials.token().await else {
            error!("No credential available, WebSocket connection not opened");
            return Err(WsError::MissingCredential);
        };

        let url = connection_url(&self.inner.config.ws_url, &token);
        let socket = HeartbeatSocket::new(
            self.inner.config.socket_config(url),
            self.inner.connector.clone(),
        );
        socket.set_handlers(self.lifecycle_handlers());

        let previous = self.socket_slot().replace(socket.clone());
        if let Some(previous) = previous {
            debug!("Replacing existing WebSocket connection");
            previous.disconnect();
        }

        socket.connect();
        Ok(())
    }

    /// Close the connection and drop the socket. Safe to call when idle.
    pub fn disconnect(&self) {
        let socket = self.socket_slot().take();
        if let Some(socket) = socket {
            socket.disconnect();
        }
    }

    /// Send a text frame; dropped with an error log unless connected.
    pub fn send(&self, payload: impl Into<String>) {
        match self.current_socket() {
            Some(socket) => socket.send(payload),
            None => error!("WebSocket not initialised, dropping message"),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.current_socket()
            .map(|socket| socket.state())
            .unwrap_or(ConnectionState::Closed)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Subscribe to inbound messages. Handlers run in registration order.
    pub fn add_message_handler(&self, handler: MessageHandler) -> HandlerId {
        self.inner.registry.add(handler)
    }

    /// Unsubscribe `handler`. Returns false if it was not registered.
    pub fn remove_message_handler(&self, handler: &MessageHandler) -> bool {
        self.inner.registry.remove(handler)
    }

    pub fn clear_message_handlers(&self) {
        self.inner.registry.clear();
    }

    pub fn handler_count(&self) -> usize {
        self.inner.registry.len()
    }

    fn lifecycle_handlers(&self) -> SocketHandlers {
        let notifier = &self.inner.notifier;
        let on_open = notifier.clone();
        let on_close = notifier.clone();
        let on_error = notifier.clone();
        let on_exhausted = notifier.clone();
        let registry = self.inner.registry.clone();

        SocketHandlers::new()
            .on_open(move || on_open.notify(Notification::connected()))
            .on_close(move || on_close.notify(Notification::offline()))
            .on_error(move |_| on_error.notify(Notification::connection_lost()))
            .on_reconnect_exhausted(move |attempts| {
                on_exhausted.notify(Notification::reconnect_failed(attempts))
            })
            .on_message(move |message| {
                registry.dispatch(message);
            })
    }
}

/// Append the credential to a WebSocket endpoint as the `token` query
/// parameter.
pub fn connection_url(endpoint: &str, token: &str) -> String {
    let separator = if endpoint.contains('?') { '&' } else { '?' };
    format!(
        "{}{}token={}",
        endpoint,
        separator,
        urlencoding::encode(token)
    )
}
