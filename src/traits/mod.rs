//! Trait abstractions for dependency injection and testability.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP transport (one attempt per request)
//! - [`WsConnector`] - opens WebSocket connections
//! - [`CredentialsProvider`] - storage for the session credential

pub mod credentials;
pub mod http;
pub mod websocket;

pub use credentials::{CredentialsError, CredentialsProvider};
pub use http::{set_header, Headers, HttpClient, HttpError, Method, Request, Response};
pub use websocket::{FrameSink, FrameStream, WsConnector, WsError, WsTransport};
