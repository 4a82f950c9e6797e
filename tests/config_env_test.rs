//! Environment overrides for client configuration.

use linda::config::{ClientConfig, DEFAULT_API_BASE_URL, ENV_API_BASE_URL, ENV_WS_URL};
use serial_test::serial;

fn clear_env() {
    std::env::remove_var(ENV_API_BASE_URL);
    std::env::remove_var(ENV_WS_URL);
}

#[test]
#[serial]
fn test_env_overrides_endpoints() {
    clear_env();
    std::env::set_var(ENV_API_BASE_URL, "https://chat.example.com/api/linda");
    std::env::set_var(ENV_WS_URL, " wss://chat.example.com/ws ");

    let config = ClientConfig::from_env();
    assert_eq!(config.api_base_url, "https://chat.example.com/api/linda");
    assert_eq!(config.ws_url, "wss://chat.example.com/ws");
    clear_env();
}

#[test]
#[serial]
fn test_blank_env_keeps_defaults() {
    clear_env();
    std::env::set_var(ENV_API_BASE_URL, "   ");

    let config = ClientConfig::from_env();
    assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    assert_eq!(config, ClientConfig::default());
    clear_env();
}
