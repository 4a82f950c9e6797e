//! File-based credentials provider.

use async_trait::async_trait;
use std::path::Path;

use crate::auth::credentials::{Credentials, CredentialsManager};
use crate::traits::{CredentialsError, CredentialsProvider};

/// Credentials stored in `~/.linda/.credentials.json`.
///
/// # Example
///
/// ```ignore
/// use linda::adapters::FileCredentialsProvider;
/// use linda::traits::CredentialsProvider;
///
/// let provider = FileCredentialsProvider::new()?;
/// if let Some(token) = provider.token().await {
///     println!("signed in");
/// }
/// ```
#[derive(Debug)]
pub struct FileCredentialsProvider {
    manager: CredentialsManager,
}

impl FileCredentialsProvider {
    /// Provider backed by the default credentials file.
    pub fn new() -> Result<Self, CredentialsError> {
        CredentialsManager::new()
            .map(|manager| Self { manager })
            .ok_or(CredentialsError::NoHomeDirectory)
    }

    /// Provider backed by a specific manager; used by tests.
    pub fn with_manager(manager: CredentialsManager) -> Self {
        Self { manager }
    }

    pub fn credentials_path(&self) -> &Path {
        self.manager.credentials_path()
    }
}

#[async_trait]
impl CredentialsProvider for FileCredentialsProvider {
    async fn load(&self) -> Result<Option<Credentials>, CredentialsError> {
        let creds = self
            .manager
            .load()
            .map_err(|e| CredentialsError::LoadFailed(e.to_string()))?;
        Ok((!creds.is_empty()).then_some(creds))
    }

    async fn save(&self, creds: &Credentials) -> Result<(), CredentialsError> {
        self.manager
            .save(creds)
            .map_err(|e| CredentialsError::SaveFailed(e.to_string()))
    }

    async fn clear(&self) -> Result<(), CredentialsError> {
        self.manager
            .clear()
            .map_err(|e| CredentialsError::ClearFailed(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn provider(dir: &TempDir) -> FileCredentialsProvider {
        FileCredentialsProvider::with_manager(CredentialsManager::with_path(
            dir.path().join(".credentials.json"),
        ))
    }

    #[tokio::test]
    async fn test_missing_file_loads_none() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        assert!(provider.load().await.unwrap().is_none());
        assert_eq!(provider.token().await, None);
    }

    #[tokio::test]
    async fn test_save_load_clear() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);

        provider
            .save(&Credentials::with_token("tok", Some("amy".to_string())))
            .await
            .unwrap();
        assert_eq!(provider.token().await.as_deref(), Some("tok"));
        assert!(provider.credentials_path().exists());

        provider.clear().await.unwrap();
        assert_eq!(provider.token().await, None);
        assert!(!provider.credentials_path().exists());
    }

    #[tokio::test]
    async fn test_clear_twice_is_ok() {
        let dir = TempDir::new().unwrap();
        let provider = provider(&dir);
        provider.clear().await.unwrap();
        provider.clear().await.unwrap();
    }
}
