//! WebSocket layer.
//!
//! - [`HeartbeatSocket`]: one connection with heartbeat and bounded reconnect
//! - [`SubscriberRegistry`]: ordered fan-out of inbound messages
//! - [`ConnectionManager`]: the app-wide connection built on both

mod manager;
mod messages;
mod registry;
mod socket;

pub use manager::{connection_url, ConnectionManager};
pub use messages::{InboundMessage, WsEvent, WsEventType};
pub use registry::{HandlerId, MessageHandler, SubscriberRegistry};
pub use socket::{ConnectionState, HeartbeatSocket, SocketConfig, SocketHandlers};

pub use crate::traits::WsError;
