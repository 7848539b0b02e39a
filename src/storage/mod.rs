mod file_store;

pub use file_store::FileStore;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::Error;

/// Key under which the current-schema conversation collection is stored.
pub const CONVERSATIONS_KEY: &str = "claude-conversations";
/// Legacy single-conversation key, consumed and removed during migration.
pub const LEGACY_CONVERSATION_KEY: &str = "claude-conversation";
pub const API_KEY_KEY: &str = "claude-api-key";
pub const SELECTED_MODEL_KEY: &str = "claude-selected-model";
pub const SYSTEM_MESSAGE_KEY: &str = "claude-system-message";

/// Durable store of named string blobs. The core never touches a global
/// store directly; everything goes through this port so tests can inject
/// an in-memory fake.
///
/// Reads and removals absorb their own failures (a blob that cannot be
/// read is treated as absent); only writes surface errors to the caller.
pub trait StorageStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), Error>;
    fn remove(&self, key: &str);
}

/// In-memory storage backend. Clones share the same underlying map, so a
/// config service and a conversation store handed clones of the same
/// `MemoryStore` see each other's writes, like two consumers of one
/// localStorage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.inner
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.inner.lock().unwrap().remove(key);
    }
}
