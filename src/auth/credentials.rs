//! Credentials storage for the Linda client.
//!
//! The session credential is kept in `~/.linda/.credentials.json`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The credentials directory name.
const CREDENTIALS_DIR: &str = ".linda";

/// The credentials file name.
const CREDENTIALS_FILE: &str = ".credentials.json";

/// Stored session credential.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credentials {
    /// Opaque bearer token issued by `/user/login` or `/user/register`.
    pub token: Option<String>,
    /// The user the token was issued for.
    #[serde(default)]
    pub username: Option<String>,
    /// When the token was stored.
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Credentials {
    /// Create new empty credentials.
    pub fn new() -> Self {
        Self::default()
    }

    /// Credentials for a freshly issued token.
    pub fn with_token(token: impl Into<String>, username: Option<String>) -> Self {
        Self {
            token: Some(token.into()),
            username,
            saved_at: Some(Utc::now()),
        }
    }

    /// Check if the credentials carry a non-empty token.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True when nothing worth persisting is set.
    pub fn is_empty(&self) -> bool {
        self.token.is_none() && self.username.is_none() && self.saved_at.is_none()
    }
}

/// Manages credential storage on disk.
#[derive(Debug, Clone)]
pub struct CredentialsManager {
    /// Path to the credentials file.
    credentials_path: PathBuf,
}

impl CredentialsManager {
    /// Create a manager for the default location under the home directory.
    ///
    /// Returns `None` if the home directory cannot be determined.
    pub fn new() -> Option<Self> {
        let home = dirs::home_dir()?;
        Some(Self::with_path(
            home.join(CREDENTIALS_DIR).join(CREDENTIALS_FILE),
        ))
    }

    /// Create a manager for an explicit file path.
    pub fn with_path(credentials_path: impl Into<PathBuf>) -> Self {
        Self {
            credentials_path: credentials_path.into(),
        }
    }

    /// Get the path to the credentials file.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    /// Load credentials from the credentials file.
    ///
    /// A missing file yields empty credentials. A corrupt file is logged and
    /// also yields empty credentials, so a bad file never locks the user out
    /// of signing in again.
    pub fn load(&self) -> io::Result<Credentials> {
        let file = match File::open(&self.credentials_path) {
            Ok(f) => f,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Credentials::default()),
            Err(e) => return Err(e),
        };

        match serde_json::from_reader(BufReader::new(file)) {
            Ok(creds) => Ok(creds),
            Err(e) => {
                tracing::warn!(
                    "Ignoring unreadable credentials file {}: {}",
                    self.credentials_path.display(),
                    e
                );
                Ok(Credentials::default())
            }
        }
    }

    /// Save credentials, creating the parent directory if needed.
    pub fn save(&self, credentials: &Credentials) -> io::Result<()> {
        if let Some(parent) = self.credentials_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = File::create(&self.credentials_path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, credentials)?;
        writer.flush()
    }

    /// Remove the credentials file. A missing file is not an error.
    pub fn clear(&self) -> io::Result<()> {
        match fs::remove_file(&self.credentials_path) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}
