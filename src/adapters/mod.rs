//! Concrete implementations of the traits in `crate::traits`.
//!
//! - [`ReqwestHttpClient`]: HTTP over reqwest
//! - [`TungsteniteConnector`]: WebSocket over tokio-tungstenite
//! - [`FileCredentialsProvider`]: credential file under the home directory
//!
//! Test doubles live in [`mock`].

pub mod file_credentials;
pub mod mock;
pub mod reqwest_http;
pub mod tungstenite_ws;

pub use file_credentials::FileCredentialsProvider;
pub use reqwest_http::ReqwestHttpClient;
pub use tungstenite_ws::TungsteniteConnector;
