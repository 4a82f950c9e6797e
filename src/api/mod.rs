//! Typed wrappers around the Linda HTTP endpoints.
//!
//! Each function issues one call through an [`ApiClient`](crate::http::ApiClient),
//! so authorization and envelope handling are the client's concern.

pub mod auth;
pub mod chat;
pub mod session;

/// Endpoint paths, relative to the API base URL.
pub mod routes {
    pub const USER_LOGIN: &str = "/user/login";
    pub const USER_REGISTER: &str = "/user/register";
    pub const CHAT_MESSAGE: &str = "/chat/message";
    pub const CHAT_HISTORY: &str = "/chat/history";
    pub const SESSION_INFO: &str = "/session/info";
    pub const SESSION_HISTORY: &str = "/session/history";
}

pub use auth::{login, register, LoginParams, RegisterParams};
pub use chat::{get_history, send_message, SendMessageParams};
pub use session::{delete_session, get_session_list};

/// `path?key=value&...` with every value percent-encoded.
pub(crate) fn with_query(path: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_query_encodes_values() {
        assert_eq!(
            with_query("/chat/history", &[("id", "a b&c")]),
            "/chat/history?id=a%20b%26c"
        );
    }

    #[test]
    fn test_with_query_multiple_params() {
        assert_eq!(
            with_query("/session/history", &[("page", "1"), ("size", "20")]),
            "/session/history?page=1&size=20"
        );
    }

    #[test]
    fn test_with_query_empty() {
        assert_eq!(with_query("/x", &[]), "/x");
    }
}
