//! Client configuration.
//!
//! Endpoints default to a local development server and can be overridden
//! with `LINDA_API_BASE_URL` and `LINDA_WS_URL`.

use std::time::Duration;

use crate::websocket::SocketConfig;

/// Default base URL of the HTTP API.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8334/api/linda";

/// Default WebSocket endpoint.
pub const DEFAULT_WS_URL: &str = "ws://localhost:8335/api/linda/ws";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_millis(10_000);

/// Environment variable overriding [`DEFAULT_API_BASE_URL`].
pub const ENV_API_BASE_URL: &str = "LINDA_API_BASE_URL";

/// Environment variable overriding [`DEFAULT_WS_URL`].
pub const ENV_WS_URL: &str = "LINDA_WS_URL";

/// Configuration shared by the HTTP client and the connection manager.
///
/// # Example
///
/// ```
/// use linda::config::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_api_base_url("https://chat.example.com/api/linda")
///     .with_request_timeout(Duration::from_secs(5));
/// assert_eq!(config.request_timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL every HTTP path is appended to
    pub api_base_url: String,
    /// WebSocket endpoint, without the credential query parameter
    pub ws_url: String,
    /// Timeout applied to requests that don't override it
    pub request_timeout: Duration,
    /// Reconnect attempts before the socket gives up
    pub reconnect_attempts: u32,
    /// Delay before each reconnect attempt
    pub reconnect_interval: Duration,
    /// Heartbeat period while the socket is open
    pub heartbeat_interval: Duration,
    /// Heartbeat payload
    pub heartbeat_message: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let socket = SocketConfig::new(DEFAULT_WS_URL);
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            ws_url: DEFAULT_WS_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            reconnect_attempts: socket.reconnect_attempts,
            reconnect_interval: socket.reconnect_interval,
            heartbeat_interval: socket.heartbeat_interval,
            heartbeat_message: socket.heartbeat_message,
        }
    }
}

impl ClientConfig {
    /// Defaults, with endpoint overrides taken from the environment.
    ///
    /// Unset or blank variables keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(url) = env_override(ENV_API_BASE_URL) {
            config.api_base_url = url;
        }
        if let Some(url) = env_override(ENV_WS_URL) {
            config.ws_url = url;
        }
        config
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_ws_url(mut self, url: impl Into<String>) -> Self {
        self.ws_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_reconnect(mut self, attempts: u32, interval: Duration) -> Self {
        self.reconnect_attempts = attempts;
        self.reconnect_interval = interval;
        self
    }

    pub fn with_heartbeat(mut self, interval: Duration, message: impl Into<String>) -> Self {
        self.heartbeat_interval = interval;
        self.heartbeat_message = message.into();
        self
    }

    /// Socket settings for a connection to `url`.
    pub fn socket_config(&self, url: impl Into<String>) -> SocketConfig {
        SocketConfig {
            reconnect_attempts: self.reconnect_attempts,
            reconnect_interval: self.reconnect_interval,
            heartbeat_interval: self.heartbeat_interval,
            heartbeat_message: self.heartbeat_message.clone(),
            ..SocketConfig::new(url)
        }
    }
}

fn env_override(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.ws_url, DEFAULT_WS_URL);
        assert_eq!(config.request_timeout, Duration::from_millis(10_000));
        assert_eq!(config.reconnect_attempts, 3);
        assert_eq!(config.reconnect_interval, Duration::from_millis(3000));
        assert_eq!(config.heartbeat_interval, Duration::from_millis(30_000));
        assert_eq!(config.heartbeat_message, "ping");
    }

    #[test]
    fn test_socket_config_carries_overrides() {
        let config = ClientConfig::default()
            .with_reconnect(5, Duration::from_millis(100))
            .with_heartbeat(Duration::from_secs(1), "hb");
        let socket = config.socket_config("ws://x/ws?token=t");
        assert_eq!(socket.url, "ws://x/ws?token=t");
        assert_eq!(socket.reconnect_attempts, 5);
        assert_eq!(socket.reconnect_interval, Duration::from_millis(100));
        assert_eq!(socket.heartbeat_interval, Duration::from_secs(1));
        assert_eq!(socket.heartbeat_message, "hb");
        assert_eq!(socket.heartbeat_ack, "pong");
    }
}
