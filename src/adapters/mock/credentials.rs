//! In-memory credentials provider for testing.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::auth::credentials::Credentials;
use crate::traits::{CredentialsError, CredentialsProvider};

/// Credentials held in memory, with switchable failures.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCredentials {
    credentials: Arc<Mutex<Option<Credentials>>>,
    fail_load: Arc<AtomicBool>,
    fail_clear: Arc<AtomicBool>,
    clear_calls: Arc<AtomicUsize>,
}

impl InMemoryCredentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider already holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        let provider = Self::new();
        provider.set_credentials(Some(Credentials::with_token(token, None)));
        provider
    }

    fn slot(&self) -> MutexGuard<'_, Option<Credentials>> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_fail_load(&self, fail: bool) {
        self.fail_load.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    pub fn get_credentials(&self) -> Option<Credentials> {
        self.slot().clone()
    }

    pub fn set_credentials(&self, creds: Option<Credentials>) {
        *self.slot() = creds;
    }

    /// Number of `clear()` calls, failed ones included.
    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        if self.fail_load.load(Ordering::SeqCst) {
            return Err(CredentialsError::LoadFailed("mock load failure".to_string()));
        }
        Ok(self.get_credentials())
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.set_credentials(Some(creds.clone()));
        Ok(())
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(CredentialsError::ClearFailed("mock clear failure".to_string()));
        }
        self.set_credentials(None);
        Ok(())
    }
}
