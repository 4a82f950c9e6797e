//! Credentials provider trait abstraction.
//!
//! Both the HTTP client and the connection manager read the bearer
//! credential through [`CredentialsProvider`]. Inside the client layer only
//! the HTTP client's session-expiry path writes to it.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::Credentials;

/// Credentials operation errors.
#[derive(Debug, Clone, Error)]
pub enum CredentialsError {
    /// Failed to load credentials
    #[error("Failed to load credentials: {0}")]
    LoadFailed(String),
    /// Failed to save credentials
    #[error("Failed to save credentials: {0}")]
    SaveFailed(String),
    /// Failed to clear credentials
    #[error("Failed to clear credentials: {0}")]
    ClearFailed(String),
    /// No home directory to store credentials in
    #[error("Could not determine home directory")]
    NoHomeDirectory,
}

/// Trait for credentials storage and retrieval.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load credentials from storage.
    ///
    /// # Returns
    /// - `Ok(Some(credentials))` if credentials exist
    /// - `Ok(None)` if nothing is stored
    /// - `Err(error)` if loading failed
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError>;

    /// Save credentials to storage.
    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError>;

    /// Clear all stored credentials.
    async fn clear(&self) -> Result<(), CredentialsError>;

    /// The current bearer token, if one is stored.
    ///
    /// Load failures are treated as "no token"; callers never fail because
    /// the store is unreadable.
    async fn token(&self) -> Option<String> {
        match self.load().await {
            Ok(creds) => creds.and_then(|c| c.token).filter(|t| !t.is_empty()),
            Err(e) => {
                tracing::warn!("Could not read stored credentials: {}", e);
                None
            }
        }
    }
}
