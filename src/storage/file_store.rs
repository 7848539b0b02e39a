use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use crate::error::Error;

use super::StorageStore;

/// Storage backend that keeps each blob in its own file under the
/// platform data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open the store at the default location, creating the directory if
    /// it does not exist yet.
    pub fn new() -> Result<Self, Error> {
        let dir = dirs::data_dir().ok_or(Error::NoDataDir)?.join("ClaudeChat");
        Self::at(dir)
    }

    /// Open the store rooted at an explicit directory.
    pub fn at(dir: PathBuf) -> Result<Self, Error> {
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    fn blob_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl StorageStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.blob_path(key)) {
            Ok(content) => Some(content),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored blob, treating as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        fs::write(self.blob_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) {
        match fs::remove_file(self.blob_path(key)) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => tracing::warn!(key, error = %err, "failed to remove stored blob"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::at(dir.path().join("store")).unwrap();
        (dir, store)
    }

    #[test]
    fn round_trips_blobs_on_disk() {
        let (_dir, store) = temp_store();
        assert!(store.get("claude-api-key").is_none());

        store.set("claude-api-key", "sk-ant-test").unwrap();
        assert_eq!(store.get("claude-api-key").as_deref(), Some("sk-ant-test"));
    }

    #[test]
    fn remove_is_idempotent() {
        let (_dir, store) = temp_store();
        store.set("key", "value").unwrap();
        store.remove("key");
        store.remove("key");
        assert!(store.get("key").is_none());
    }

    #[test]
    fn reopening_sees_previous_writes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store");
        {
            let store = FileStore::at(path.clone()).unwrap();
            store.set("key", "value").unwrap();
        }
        let reopened = FileStore::at(path).unwrap();
        assert_eq!(reopened.get("key").as_deref(), Some("value"));
    }
}
