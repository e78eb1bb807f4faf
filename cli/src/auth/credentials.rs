//! File-backed credential storage.
//!
//! Exactly one [`StoredCredential`] lives at `~/.n8r/credentials.json`. The
//! directory is owner-only and the file owner read/write only; each login
//! overwrites the whole file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::auth::tokens::{StoredCredential, TokenGrant};
use crate::config::AppPaths;
use crate::error::{N8rError, Result};

/// What the credential file says about the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialStatus {
    /// No credential file.
    NotAuthenticated,
    /// A credential exists but its expiry has passed.
    Expired(StoredCredential),
    /// A usable credential.
    Active(StoredCredential),
}

/// Storage for the single n8r credential.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// Opens the store under the n8r configuration directory, creating the
    /// directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Environment`] if the directory cannot be created.
    pub fn new(paths: &AppPaths) -> Result<Self> {
        paths.ensure_config_dir()?;
        Ok(Self {
            path: paths.credentials_file(),
        })
    }

    /// Path of the credentials file.
    #[cfg(test)]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saves `grant`, fixing its expiry relative to now.
    #[cfg(test)]
    pub fn save(&self, grant: &TokenGrant) -> Result<StoredCredential> {
        self.save_at(grant, Utc::now())
    }

    /// Saves `grant` as if written at `now`. Overwrites any prior credential.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Persistence`] if the file cannot be written.
    pub fn save_at(&self, grant: &TokenGrant, now: DateTime<Utc>) -> Result<StoredCredential> {
        let credential = StoredCredential::from_grant(grant, now);
        let json = serde_json::to_string_pretty(&credential)
            .map_err(|e| N8rError::Persistence(format!("failed to encode credentials: {e}")))?;

        write_private(&self.path, json.as_bytes()).map_err(|e| {
            N8rError::Persistence(format!("failed to write {}: {e}", self.path.display()))
        })?;

        tracing::debug!(path = %self.path.display(), expires_at = %credential.expires_at, "saved credentials");
        Ok(credential)
    }

    /// Loads the stored credential.
    ///
    /// Returns `None` if no credential is stored.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Persistence`] if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Option<StoredCredential>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(N8rError::Persistence(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let credential = serde_json::from_str(&contents).map_err(|e| {
            N8rError::Persistence(format!("failed to parse {}: {e}", self.path.display()))
        })?;
        Ok(Some(credential))
    }

    /// Deletes the stored credential.
    ///
    /// Returns `true` if a credential was removed, `false` if none existed.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Persistence`] if the file exists but cannot be removed.
    pub fn delete(&self) -> Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(N8rError::Persistence(format!(
                "failed to delete {}: {e}",
                self.path.display()
            ))),
        }
    }

    /// Classifies the stored credential: `load()` plus an expiry check.
    ///
    /// # Errors
    ///
    /// Returns [`N8rError::Persistence`] if the file cannot be read or parsed.
    pub fn status(&self) -> Result<CredentialStatus> {
        Ok(match self.load()? {
            None => CredentialStatus::NotAuthenticated,
            Some(credential) if credential.is_expired() => CredentialStatus::Expired(credential),
            Some(credential) => CredentialStatus::Active(credential),
        })
    }
}

/// Writes `data` to `path`, leaving the file readable and writable by its owner only.
#[cfg(unix)]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, data: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    use super::*;

    fn grant(expires_in: u64) -> TokenGrant {
        TokenGrant {
            access_token: "tok1".to_string(),
            token_type: "Bearer".to_string(),
            expires_in,
        }
    }

    fn store_in(home: &TempDir) -> CredentialStore {
        CredentialStore::new(&AppPaths::with_home(home.path())).unwrap()
    }

    #[test]
    fn new_creates_config_dir() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        assert!(home.path().join(".n8r").is_dir());
        assert_eq!(store.path(), home.path().join(".n8r/credentials.json"));
    }

    #[test]
    fn save_and_load_round_trip() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        let before = Utc::now();
        let saved = store.save(&grant(3600)).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, saved);
        assert!(loaded.saved_at >= before);
        assert_eq!(loaded.expires_at, loaded.saved_at + Duration::seconds(3600));
        assert!(!loaded.is_expired());
    }

    #[test]
    fn saved_file_is_indented_json() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);
        let at = Utc.with_ymd_and_hms(2026, 2, 1, 8, 30, 0).unwrap();

        store.save_at(&grant(60), at).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        assert!(contents.starts_with("{\n  \"access_token\": \"tok1\""));
        assert!(contents.contains("\"expires_at\": \"2026-02-01T08:31:00Z\""));
        assert!(contents.contains("\"saved_at\": \"2026-02-01T08:30:00Z\""));
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        // A pre-existing, world-readable file gets tightened too.
        fs::write(store.path(), "{}").unwrap();
        fs::set_permissions(store.path(), fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&grant(60)).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn save_overwrites_previous_credential() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        store.save(&grant(60)).unwrap();
        let second = TokenGrant {
            access_token: "tok2".to_string(),
            token_type: "Bearer".to_string(),
            expires_in: 120,
        };
        store.save(&second).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, "tok2");
    }

    #[test]
    fn load_missing_returns_none() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn load_corrupted_json_returns_error() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);
        fs::write(store.path(), "{ invalid json }").unwrap();

        assert!(matches!(store.load(), Err(N8rError::Persistence(_))));
    }

    #[test]
    fn load_wrong_shape_returns_error() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);
        fs::write(store.path(), r#"{"access_token": "tok1"}"#).unwrap();

        assert!(matches!(store.load(), Err(N8rError::Persistence(_))));
    }

    #[test]
    fn delete_removes_credential() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);
        store.save(&grant(60)).unwrap();

        assert!(store.delete().unwrap());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn delete_nonexistent_succeeds() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        assert!(!store.delete().unwrap());
        assert!(!store.delete().unwrap());
    }

    #[test]
    fn delete_failure_is_persistence_error() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);
        // A directory in place of the file cannot be removed with remove_file.
        fs::create_dir(store.path()).unwrap();

        assert!(matches!(store.delete(), Err(N8rError::Persistence(_))));
    }

    #[test]
    fn status_reflects_expiry() {
        let home = TempDir::new().unwrap();
        let store = store_in(&home);

        assert_eq!(store.status().unwrap(), CredentialStatus::NotAuthenticated);

        let active = store.save(&grant(3600)).unwrap();
        assert_eq!(store.status().unwrap(), CredentialStatus::Active(active));

        let stale = store
            .save_at(&grant(60), Utc::now() - Duration::seconds(120))
            .unwrap();
        assert_eq!(store.status().unwrap(), CredentialStatus::Expired(stale));
    }
}
