//! Linda: network client layer for the Linda chat service.
//!
//! Two pieces do the real work:
//!
//! - [`http::ApiClient`] wraps every HTTP call: it attaches the bearer
//!   credential, unwraps the `{code, data, msg}` envelope, rejects business
//!   errors and handles session expiry.
//! - [`websocket::ConnectionManager`] owns the single live WebSocket, keeps it
//!   alive with a heartbeat, reconnects it a bounded number of times and fans
//!   inbound messages out to subscribers.
//!
//! Everything environmental (transport, credential store, notifications,
//! navigation) sits behind the traits in [`traits`], [`notifications`] and
//! [`navigation`], with production adapters in [`adapters`].

pub mod adapters;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod navigation;
pub mod notifications;
pub mod traits;
pub mod websocket;
