//! services/app/src/adapters/file_store.rs
//!
//! This module contains the file-backed implementation of the `KeyValueStore`
//! port from the `core` crate. Each key is one JSON file under the data
//! directory; writes go through a temporary file and a rename so a reader
//! never observes a half-written blob.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use ticketflow_core::ports::{KeyValueStore, PortError, PortResult};
use tracing::debug;

#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a new `FileStore`, creating the data directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> PortResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            PortError::Unexpected(format!("cannot create data dir {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PortResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(PortError::Unexpected(format!("invalid storage key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortResult<Option<String>> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set(&self, key: &str, value: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| PortError::Unexpected(format!("failed to write {}: {}", path.display(), e)))?;
        debug!(key, bytes = value.len(), "Blob written");
        Ok(())
    }

    fn remove(&self, key: &str) -> PortResult<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PortError::Unexpected(format!(
                "failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        store.set("tickets", "[]").unwrap();

        let reopened = FileStore::open(dir.path().join("data")).unwrap();
        assert_eq!(reopened.get("tickets").unwrap().as_deref(), Some("[]"));
        assert!(!dir.path().join("data/tickets.json.tmp").exists());
    }

    #[test]
    fn missing_key_reads_as_none_and_removes_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("ticketapp_session").unwrap(), None);
        store.remove("ticketapp_session").unwrap();

        store.set("ticketapp_session", "{}").unwrap();
        store.remove("ticketapp_session").unwrap();
        assert_eq!(store.get("ticketapp_session").unwrap(), None);
    }

    #[test]
    fn keys_with_path_characters_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.set("../escape", "x").is_err());
        assert!(store.get("").is_err());
    }
}
