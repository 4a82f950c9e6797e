//! Chat sessions.

use serde_json::Value;

use super::{routes, with_query};
use crate::error::ApiError;
use crate::http::{ApiClient, ApiResponse};

/// Delete a session.
pub async fn delete_session(
    client: &ApiClient,
    session_id: &str,
) -> Result<ApiResponse<Value>, ApiError> {
    let path = with_query(routes::SESSION_INFO, &[("id", session_id)]);
    client.delete(&path, None).await
}

/// One page of the user's sessions; `page` counts from 0.
pub async fn get_session_list(
    client: &ApiClient,
    page: u32,
    size: u32,
) -> Result<ApiResponse<Value>, ApiError> {
    let path = with_query(
        routes::SESSION_HISTORY,
        &[("page", &page.to_string()), ("size", &size.to_string())],
    );
    client.get(&path, None).await
}
