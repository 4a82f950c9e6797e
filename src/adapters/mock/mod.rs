//! Mock implementations for testing.
//!
//! - [`MockHttpClient`]: canned HTTP responses, recorded requests
//! - [`MockConnector`] / [`MockPeer`]: scripted WebSocket connections
//! - [`InMemoryCredentials`]: credential store with switchable failures
//! - [`RecordingNotifier`] / [`RecordingNavigator`]: capture UI side effects

pub mod credentials;
pub mod http;
pub mod surface;
pub mod websocket;

pub use credentials::InMemoryCredentials;
pub use http::{MockHttpClient, MockResponse};
pub use surface::{RecordingNavigator, RecordingNotifier};
pub use websocket::{ConnectAttempt, ConnectOutcome, MockConnector, MockPeer};
