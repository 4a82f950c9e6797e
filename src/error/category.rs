//! Error category classification.
//!
//! Every error surfaced by the client layer maps onto one of these
//! categories so callers can decide how to react without matching on
//! every concrete variant.

use std::fmt;

use crate::traits::{CredentialsError, WsError};

/// High-level categorization of client errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Transport failures (connection refused, DNS, timeout, abrupt close).
    Network,

    /// Non-2xx HTTP responses that carried no business envelope.
    Server,

    /// The server answered with a business error code.
    Business,

    /// Missing or expired credential.
    Auth,

    /// The server's reply could not be decoded, or the request could not be encoded.
    Protocol,

    /// Local credential storage failed.
    Storage,
}

impl ErrorCategory {
    /// Returns true if the caller may reasonably try the operation again.
    ///
    /// The client itself never retries HTTP calls.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCategory::Network | ErrorCategory::Server)
    }

    /// Short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "network",
            ErrorCategory::Server => "server",
            ErrorCategory::Business => "business",
            ErrorCategory::Auth => "auth",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Storage => "storage",
        }
    }

    /// Suggested recovery action, suitable for showing to the user.
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            ErrorCategory::Network => "Check your internet connection and try again",
            ErrorCategory::Server => {
                "The server may be experiencing issues. Please try again later"
            }
            ErrorCategory::Business => "Please check your input and try again",
            ErrorCategory::Auth => "Please sign in again",
            ErrorCategory::Protocol => {
                "The server sent an unexpected reply. Please report this issue if it persists"
            }
            ErrorCategory::Storage => "Check file permissions and available disk space",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl WsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WsError::ConnectionFailed(_) | WsError::Disconnected | WsError::SendFailed(_) => {
                ErrorCategory::Network
            }
            WsError::Protocol(_) => ErrorCategory::Protocol,
            WsError::MissingCredential => ErrorCategory::Auth,
        }
    }
}

impl CredentialsError {
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::Storage
    }
}
