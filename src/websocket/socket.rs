//! WebSocket with heartbeat and bounded reconnection.
//!
//! [`HeartbeatSocket`] owns at most one physical connection. Each connection
//! runs in its own task and is tagged with a generation number; `connect()`
//! and `disconnect()` bump the generation, so anything a superseded
//! connection or timer reports afterwards is ignored.
//!
//! Lifecycle:
//!
//! - open: reset the reconnect counter, start the heartbeat, call `on_open`
//! - text frame: swallow the heartbeat ack, otherwise call `on_message`
//! - error: call `on_error` (a failed handshake is followed by a close)
//! - close: stop both timers, call `on_close`, then maybe schedule a reconnect
//!
//! A reconnect is scheduled only while the attempt counter is below the
//! configured limit and nobody called `connect()`/`disconnect()` in between.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use super::messages::InboundMessage;
use crate::traits::{WsConnector, WsError, WsTransport};

/// Lifecycle state of the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closing,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(label)
    }
}

/// Socket settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SocketConfig {
    /// Full endpoint URL, credential included
    pub url: String,
    /// Reconnect attempts before giving up; 0 disables reconnection
    pub reconnect_attempts: u32,
    /// Delay before each reconnect attempt
    pub reconnect_interval: Duration,
    /// Heartbeat period; zero disables the heartbeat
    pub heartbeat_interval: Duration,
    /// Payload sent on every heartbeat; empty disables the heartbeat
    pub heartbeat_message: String,
    /// Inbound payload acknowledging a heartbeat, never forwarded
    pub heartbeat_ack: String,
}

impl SocketConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reconnect_attempts: 3,
            reconnect_interval: Duration::from_millis(3000),
            heartbeat_interval: Duration::from_millis(30_000),
            heartbeat_message: "ping".to_string(),
            heartbeat_ack: "pong".to_string(),
        }
    }

    fn heartbeat_enabled(&self) -> bool {
        !self.heartbeat_interval.is_zero() && !self.heartbeat_message.is_empty()
    }
}

type LifecycleHandler = Arc<dyn Fn() + Send + Sync>;
type ErrorHandler = Arc<dyn Fn(&WsError) + Send + Sync>;
type MessageCallback = Arc<dyn Fn(&InboundMessage) + Send + Sync>;
type ExhaustedHandler = Arc<dyn Fn(u32) + Send + Sync>;

/// Callbacks invoked by the socket. All are optional.
///
/// Handlers run on the connection task; they must not block.
#[derive(Clone, Default)]
pub struct SocketHandlers {
    on_open: Option<LifecycleHandler>,
    on_close: Option<LifecycleHandler>,
    on_message: Option<MessageCallback>,
    on_error: Option<ErrorHandler>,
    on_reconnect_exhausted: Option<ExhaustedHandler>,
}

impl SocketHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(f));
        self
    }

    pub fn on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    pub fn on_message(mut self, f: impl Fn(&InboundMessage) + Send + Sync + 'static) -> Self {
        self.on_message = Some(Arc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&WsError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(f));
        self
    }

    /// Called once the reconnect limit is reached, with the attempt count.
    pub fn on_reconnect_exhausted(mut self, f: impl Fn(u32) + Send + Sync + 'static) -> Self {
        self.on_reconnect_exhausted = Some(Arc::new(f));
        self
    }
}

impl fmt::Debug for SocketHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SocketHandlers")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_message", &self.on_message.is_some())
            .field("on_error", &self.on_error.is_some())
            .field("on_reconnect_exhausted", &self.on_reconnect_exhausted.is_some())
            .finish()
    }
}

enum Command {
    Send(String),
    Close,
}

struct SocketInner {
    state: ConnectionState,
    generation: u64,
    reconnect_count: u32,
    handlers: SocketHandlers,
    commands: Option<mpsc::UnboundedSender<Command>>,
    heartbeat: Option<JoinHandle<()>>,
    reconnect: Option<JoinHandle<()>>,
}

impl SocketInner {
    fn clear_timers(&mut self) {
        if let Some(handle) = self.heartbeat.take() {
            handle.abort();
        }
        if let Some(handle) = self.reconnect.take() {
            handle.abort();
        }
    }
}

struct Shared {
    config: SocketConfig,
    connector: Arc<dyn WsConnector>,
    inner: Mutex<SocketInner>,
    state_tx: watch::Sender<ConnectionState>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        self.inner
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear_timers();
    }
}

/// A WebSocket that keeps itself alive and reconnects on failure.
///
/// Cloning yields another handle to the same socket. Every method must be
/// called from within a Tokio runtime.
#[derive(Clone)]
pub struct HeartbeatSocket {
    shared: Arc<Shared>,
}

impl HeartbeatSocket {
    pub fn new(config: SocketConfig, connector: Arc<dyn WsConnector>) -> Self {
        let (state_tx, _) = watch::channel(ConnectionState::Closed);
        Self {
            shared: Arc::new(Shared {
                config,
                connector,
                inner: Mutex::new(SocketInner {
                    state: ConnectionState::Closed,
                    generation: 0,
                    reconnect_count: 0,
                    handlers: SocketHandlers::default(),
                    commands: None,
                    heartbeat: None,
                    reconnect: None,
                }),
                state_tx,
            }),
        }
    }

    pub fn config(&self) -> &SocketConfig {
        &self.shared.config
    }

    /// Replace all handlers.
    pub fn set_handlers(&self, handlers: SocketHandlers) {
        self.shared.lock().handlers = handlers;
    }

    pub fn state(&self) -> ConnectionState {
        self.shared.lock().state
    }

    /// Subscribe to state changes.
    pub fn state_receiver(&self) -> watch::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    /// Reconnect attempts made since the last successful open.
    pub fn reconnect_count(&self) -> u32 {
        self.shared.lock().reconnect_count
    }

    /// Open the connection. Does nothing (besides a warning) if already open.
    ///
    /// A pending connection attempt is abandoned in favour of the new one.
    pub fn connect(&self) {
        self.shared.connect();
    }

    /// Close the connection and stop the heartbeat and any pending reconnect.
    ///
    /// The close is not reported to `on_close` and never triggers a reconnect.
    pub fn disconnect(&self) {
        let mut inner = self.shared.lock();
        inner.clear_timers();
        inner.generation += 1;
        if let Some(commands) = inner.commands.take() {
            let _ = commands.send(Command::Close);
        }
        if inner.state != ConnectionState::Closed {
            info!("WebSocket disconnected");
        }
        self.shared.set_state(&mut inner, ConnectionState::Closed);
    }

    /// Send a text frame. Dropped with an error log unless the socket is open.
    pub fn send(&self, payload: impl Into<String>) {
        let inner = self.shared.lock();
        match (&inner.commands, inner.state) {
            (Some(commands), ConnectionState::Open) => {
                if commands.send(Command::Send(payload.into())).is_err() {
                    error!("WebSocket transport is gone, dropping message");
                }
            }
            (_, state) => error!("WebSocket not connected ({}), dropping message", state),
        }
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SocketInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, inner: &mut SocketInner, state: ConnectionState) {
        inner.state = state;
        self.state_tx.send_replace(state);
    }

    fn connect(self: &Arc<Self>) {
        let mut inner = self.lock();
        if inner.state == ConnectionState::Open {
            warn!("WebSocket already connected");
            return;
        }
        info!("Opening WebSocket connection...");

        inner.clear_timers();
        inner.generation += 1;
        let generation = inner.generation;
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        // Dropping the previous sender ends any half-open transport.
        inner.commands = Some(commands_tx);
        self.set_state(&mut inner, ConnectionState::Connecting);
        drop(inner);

        tokio::spawn(run_transport(self.clone(), generation, commands_rx));
    }

    fn handle_open(self: &Arc<Self>, generation: u64) -> bool {
        let mut inner = self.lock();
        if inner.generation != generation {
            return false;
        }
        info!("WebSocket connected");
        inner.reconnect_count = 0;
        self.set_state(&mut inner, ConnectionState::Open);
        self.start_heartbeat(&mut inner, generation);
        let on_open = inner.handlers.on_open.clone();
        drop(inner);

        if let Some(handler) = on_open {
            handler();
        }
        true
    }

    fn handle_message(&self, generation: u64, text: String) {
        let on_message = {
            let inner = self.lock();
            if inner.generation != generation {
                return;
            }
            inner.handlers.on_message.clone()
        };

        if text == self.config.heartbeat_ack {
            debug!("Heartbeat acknowledged");
            return;
        }
        if let Some(handler) = on_message {
            handler(&InboundMessage::new(text));
        }
    }

    fn handle_error(&self, generation: u64, err: &WsError) {
        let on_error = {
            let inner = self.lock();
            if inner.generation != generation {
                return;
            }
            inner.handlers.on_error.clone()
        };

        error!("WebSocket error: {}", err);
        if let Some(handler) = on_error {
            handler(err);
        }
    }

    /// The peer started the closing handshake.
    fn mark_closing(&self, generation: u64) {
        let mut inner = self.lock();
        if inner.generation == generation && inner.state == ConnectionState::Open {
            inner.clear_timers();
            self.set_state(&mut inner, ConnectionState::Closing);
        }
    }

    fn handle_close(self: &Arc<Self>, generation: u64) {
        let on_close = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return;
            }
            info!("WebSocket closed");
            inner.clear_timers();
            inner.commands = None;
            self.set_state(&mut inner, ConnectionState::Closed);
            inner.handlers.on_close.clone()
        };

        if let Some(handler) = on_close {
            handler();
        }
        self.attempt_reconnect(generation);
    }

    fn attempt_reconnect(self: &Arc<Self>, generation: u64) {
        let mut inner = self.lock();
        // A connect() or disconnect() from on_close wins.
        if inner.generation != generation || inner.state != ConnectionState::Closed {
            return;
        }

        let limit = self.config.reconnect_attempts;
        if inner.reconnect_count >= limit {
            let attempts = inner.reconnect_count;
            let on_exhausted = inner.handlers.on_reconnect_exhausted.clone();
            drop(inner);

            if limit > 0 {
                warn!("WebSocket reconnect gave up after {} attempts", attempts);
                if let Some(handler) = on_exhausted {
                    handler(attempts);
                }
            }
            return;
        }

        let delay = self.config.reconnect_interval;
        debug!("Scheduling reconnect in {:?}", delay);
        let weak: Weak<Shared> = Arc::downgrade(self);
        inner.reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = weak.upgrade() {
                shared.fire_reconnect(generation);
            }
        }));
    }

    fn fire_reconnect(self: &Arc<Self>, generation: u64) {
        {
            let mut inner = self.lock();
            if inner.generation != generation || inner.state != ConnectionState::Closed {
                return;
            }
            // This task is finishing on its own; connect() must not abort it.
            inner.reconnect.take();
            inner.reconnect_count += 1;
            info!(
                "Attempting to reconnect ({}/{})",
                inner.reconnect_count, self.config.reconnect_attempts
            );
        }
        self.connect();
    }

    fn start_heartbeat(self: &Arc<Self>, inner: &mut SocketInner, generation: u64) {
        if let Some(handle) = inner.heartbeat.take() {
            handle.abort();
        }
        if !self.config.heartbeat_enabled() {
            return;
        }

        let period = self.config.heartbeat_interval;
        let weak: Weak<Shared> = Arc::downgrade(self);
        inner.heartbeat = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(shared) = weak.upgrade() else {
                    break;
                };
                if !shared.send_heartbeat(generation) {
                    break;
                }
            }
        }));
    }

    fn send_heartbeat(&self, generation: u64) -> bool {
        let inner = self.lock();
        if inner.generation != generation || inner.state != ConnectionState::Open {
            return false;
        }
        match &inner.commands {
            Some(commands) => {
                debug!("Sending heartbeat");
                commands
                    .send(Command::Send(self.config.heartbeat_message.clone()))
                    .is_ok()
            }
            None => false,
        }
    }
}

/// Drive one physical connection until it closes or is superseded.
async fn run_transport(
    shared: Arc<Shared>,
    generation: u64,
    mut commands: mpsc::UnboundedReceiver<Command>,
) {
    let transport = match shared.connector.connect(&shared.config.url).await {
        Ok(transport) => transport,
        Err(e) => {
            shared.handle_error(generation, &e);
            shared.handle_close(generation);
            return;
        }
    };

    let WsTransport {
        mut sink,
        mut stream,
    } = transport;

    if !shared.handle_open(generation) {
        debug!("Discarding superseded WebSocket connection");
        let _ = sink.close().await;
        return;
    }

    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => shared.handle_message(generation, text),
                Some(Ok(Message::Close(frame))) => {
                    debug!("Received close frame: {:?}", frame);
                    shared.mark_closing(generation);
                }
                Some(Ok(_)) => {
                    // Binary and control frames carry nothing for subscribers
                }
                Some(Err(e)) => {
                    shared.handle_error(generation, &e);
                    break;
                }
                None => break,
            },
            command = commands.recv() => match command {
                Some(Command::Send(text)) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        error!("Failed to send WebSocket frame: {}", e);
                    }
                }
                Some(Command::Close) | None => {
                    debug!("Closing superseded WebSocket transport");
                    let _ = sink.close().await;
                    return;
                }
            },
        }
    }

    shared.handle_close(generation);
}
