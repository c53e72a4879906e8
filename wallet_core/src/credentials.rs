//! Session persistence across runs.
//!
//! The session is stored as plain JSON under a fixed file name in the data
//! directory. A file that cannot be read back as a session is deleted and
//! treated as "no session".

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::WalletError;
use crate::session::Session;

/// File name of the persisted session inside the data directory.
pub const CREDENTIALS_FILE: &str = "hedera-credentials.json";

/// Reads and writes the persisted session.
#[derive(Clone, Debug)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// A store rooted at `data_dir`. Nothing is touched until first use.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(CREDENTIALS_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted session, if there is a usable one.
    pub fn load(&self) -> Result<Option<Session>, WalletError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(WalletError::CredentialStore(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };
        match serde_json::from_slice::<Session>(&bytes) {
            Ok(session) => {
                debug!(account = %session.account_id, "restored stored credentials");
                Ok(Some(session))
            }
            Err(e) => {
                warn!(path = %self.path.display(), "discarding corrupt stored credentials: {e}");
                self.clear()?;
                Ok(None)
            }
        }
    }

    /// Persist `session`, replacing any previous one.
    pub fn save(&self, session: &Session) -> Result<(), WalletError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                WalletError::CredentialStore(format!("failed to create {}: {e}", dir.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(session)
            .map_err(|e| WalletError::CredentialStore(format!("JSON serialization failed: {e}")))?;
        std::fs::write(&self.path, json).map_err(|e| {
            WalletError::CredentialStore(format!("failed to write {}: {e}", self.path.display()))
        })?;
        restrict_permissions(&self.path)
    }

    /// Remove the persisted session. Removing a missing file is fine.
    pub fn clear(&self) -> Result<(), WalletError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WalletError::CredentialStore(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<(), WalletError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).map_err(|e| {
        WalletError::CredentialStore(format!("failed to restrict {}: {e}", path.display()))
    })
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<(), WalletError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path().join("nested"));
        let session = Session::new("0.0.123456", "a".repeat(64));

        store.save(&session).unwrap();
        assert_eq!(store.load().unwrap(), Some(session));
    }

    #[test]
    fn stored_json_matches_browser_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save(&Session::new("0.0.7", "k")).unwrap();
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["accountId"], "0.0.7");
        assert_eq!(raw["privateKey"], "k");
    }

    #[test]
    fn corrupt_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn non_utf8_file_is_discarded() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        std::fs::write(store.path(), [0xff, 0xfe, 0x00, 0x7b]).unwrap();

        assert_eq!(store.load().unwrap(), None);
        assert!(!store.path().exists());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save(&Session::new("0.0.7", "k")).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempfile::tempdir().unwrap();
        let store = CredentialStore::new(dir.path());
        store.save(&Session::new("0.0.7", "k")).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
