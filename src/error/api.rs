//! Errors returned by the HTTP client.

use thiserror::Error;

use super::ErrorCategory;
use crate::traits::HttpError;

/// Failure of a single API call.
///
/// Business errors display as the bare server message so callers can show
/// it to the user unchanged.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] HttpError),

    /// Non-2xx response whose body was not a business envelope.
    #[error("Server error ({status}): {body}")]
    Status { status: u16, body: String },

    /// The envelope carried the generic business error code.
    #[error("{message}")]
    Business { code: i64, message: String },

    /// A 2xx response whose body was not a business envelope.
    #[error("Invalid response body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The request body could not be serialized.
    #[error("Failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ApiError::Transport(_) => ErrorCategory::Network,
            ApiError::Status { .. } => ErrorCategory::Server,
            ApiError::Business { .. } => ErrorCategory::Business,
            ApiError::Decode(_) | ApiError::Encode(_) => ErrorCategory::Protocol,
        }
    }

    /// The business code, when the server supplied one.
    pub fn code(&self) -> Option<i64> {
        match self {
            ApiError::Business { code, .. } => Some(*code),
            _ => None,
        }
    }
}
