//! Error types for the client layer.
//!
//! | Category | Source | Retryable |
//! |----------|--------|-----------|
//! | Network | transport failures | Yes |
//! | Server | non-2xx without envelope | Yes |
//! | Business | envelope code `600500` | No |
//! | Auth | missing credential | No |
//! | Protocol | undecodable bodies | No |
//! | Storage | credential file I/O | No |
//!
//! Session expiry (`600502`) is not an error: the HTTP client handles it and
//! resolves the call.

mod api;
mod category;

pub use api::ApiError;
pub use category::ErrorCategory;
pub use crate::traits::{CredentialsError, HttpError, WsError};
