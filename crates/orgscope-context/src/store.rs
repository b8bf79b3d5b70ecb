//! Impersonation session store implementations.
//!
//! [`FileImpersonationStore`] is the durable backend: one JSON document
//! per profile, replaced atomically with a temp-file rename so the four
//! session keys always land together. [`MemoryImpersonationStore`] is for
//! tests and embedders that manage persistence themselves.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use orgscope_core::directory::ImpersonationSessionStore;
use orgscope_core::error::{OrgscopeError, OrgscopeResult};
use orgscope_core::models::impersonation::ImpersonationSession;
use parking_lot::Mutex;
use tracing::{debug, warn};

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryImpersonationStore {
    session: Mutex<Option<ImpersonationSession>>,
}

impl MemoryImpersonationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ImpersonationSessionStore for MemoryImpersonationStore {
    fn read(&self) -> OrgscopeResult<Option<ImpersonationSession>> {
        Ok(self.session.lock().clone())
    }

    fn write(&self, session: &ImpersonationSession) -> OrgscopeResult<()> {
        *self.session.lock() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> OrgscopeResult<()> {
        self.session.lock().take();
        Ok(())
    }
}

/// File-backed durable store.
#[derive(Debug)]
pub struct FileImpersonationStore {
    path: PathBuf,
    // Serializes writers within this process; the rename keeps readers in
    // other processes from seeing partial files.
    lock: Mutex<()>,
}

impl FileImpersonationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn remove(&self) -> OrgscopeResult<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error("remove", &self.path, e)),
        }
    }
}

fn storage_error(op: &str, path: &Path, err: std::io::Error) -> OrgscopeError {
    OrgscopeError::Storage(format!("{op} {}: {err}", path.display()))
}

impl ImpersonationSessionStore for FileImpersonationStore {
    fn read(&self) -> OrgscopeResult<Option<ImpersonationSession>> {
        let _guard = self.lock.lock();
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("read", &self.path, e)),
        };

        match serde_json::from_str::<ImpersonationSession>(&contents) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                // A torn or hand-edited record is never trusted.
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Discarding unreadable impersonation session"
                );
                self.remove()?;
                Ok(None)
            }
        }
    }

    fn write(&self, session: &ImpersonationSession) -> OrgscopeResult<()> {
        let _guard = self.lock.lock();
        let json = serde_json::to_vec_pretty(session)
            .map_err(|e| OrgscopeError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| storage_error("create", parent, e))?;
        }

        let temp = self.temp_path();
        fs::write(&temp, json).map_err(|e| storage_error("write", &temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| storage_error("rename", &self.path, e))?;

        debug!(path = %self.path.display(), "Impersonation session persisted");
        Ok(())
    }

    fn clear(&self) -> OrgscopeResult<()> {
        let _guard = self.lock.lock();
        self.remove()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn session() -> ImpersonationSession {
        ImpersonationSession {
            target_organization_id: Uuid::new_v4(),
            acting_identity_id: Uuid::new_v4(),
            target_organization_name: "Acme".into(),
            return_path: "/admin/organizations".into(),
        }
    }

    #[test]
    fn memory_store_write_read_clear() {
        let store = MemoryImpersonationStore::new();
        assert!(store.read().unwrap().is_none());

        let s = session();
        store.write(&s).unwrap();
        assert_eq!(store.read().unwrap(), Some(s));

        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
        store.clear().unwrap();
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile").join("impersonation.json");

        let s = session();
        FileImpersonationStore::new(&path).write(&s).unwrap();

        let reopened = FileImpersonationStore::new(&path);
        assert_eq!(reopened.read().unwrap(), Some(s));
        assert!(!reopened.temp_path().exists());
    }

    #[test]
    fn file_store_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileImpersonationStore::new(dir.path().join("impersonation.json"));

        store.clear().unwrap();
        store.write(&session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.read().unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn torn_record_reads_as_empty_and_is_removed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("impersonation.json");
        let org_only = format!(r#"{{"impersonating_org_id":"{}"}}"#, Uuid::new_v4());
        fs::write(&path, org_only).unwrap();

        let store = FileImpersonationStore::new(&path);
        assert!(store.read().unwrap().is_none());
        assert!(!path.exists());
    }
}
