//! Chat messages.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{routes, with_query};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiResponse};

/// Body of `POST /chat/message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageParams {
    pub session_id: String,
    pub content: String,
}

impl SendMessageParams {
    pub fn new(session_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            content: content.into(),
        }
    }
}

/// Post a message to a chat session.
pub async fn send_message(
    client: &ApiClient,
    params: &SendMessageParams,
) -> Result<ApiResponse<Value>, ApiError> {
    client.post(routes::CHAT_MESSAGE, params, None).await
}

/// Message history of one session.
pub async fn get_history(
    client: &ApiClient,
    session_id: &str,
) -> Result<ApiResponse<Value>, ApiError> {
    let path = with_query(routes::CHAT_HISTORY, &[("id", session_id)]);
    client.get(&path, None).await
}
