//! The `{code, data, msg}` envelope every API response is wrapped in.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Generic business failure; `msg` carries the reason.
pub const BUSINESS_ERROR_CODE: i64 = 600500;

/// The server no longer accepts the stored credential.
pub const SESSION_EXPIRED_CODE: i64 = 600502;

/// Shown for a business failure that came without a message.
pub const DEFAULT_ERROR_MESSAGE: &str = "System error";

/// API response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    pub code: i64,
    pub data: Option<T>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub msg: String,
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl<T> ApiResponse<T> {
    pub fn is_business_error(&self) -> bool {
        self.code == BUSINESS_ERROR_CODE
    }

    pub fn is_session_expired(&self) -> bool {
        self.code == SESSION_EXPIRED_CODE
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }

    /// `msg`, or [`DEFAULT_ERROR_MESSAGE`] when the server left it blank.
    pub fn message_or_default(&self) -> &str {
        if self.msg.trim().is_empty() {
            DEFAULT_ERROR_MESSAGE
        } else {
            &self.msg
        }
    }
}

impl ApiResponse<Value> {
    /// Convert the untyped payload into `T`.
    pub fn decode<T: DeserializeOwned>(self) -> Result<ApiResponse<T>, serde_json::Error> {
        let data = self.data.map(serde_json::from_value).transpose()?;
        Ok(ApiResponse {
            code: self.code,
            data,
            msg: self.msg,
        })
    }
}
