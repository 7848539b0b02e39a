use crate::error::Error;
use crate::models::{default_model_id, is_known_model};
use crate::storage::{StorageStore, API_KEY_KEY, SELECTED_MODEL_KEY, SYSTEM_MESSAGE_KEY};

/// System prompt used until the user edits it.
pub const DEFAULT_SYSTEM_MESSAGE: &str =
    "You are Claude, a helpful AI assistant created by Anthropic. Be helpful, harmless, and honest.";

/// Settings persisted as individual blobs: API key, model selection, and
/// system prompt. Each setter writes through immediately.
pub struct ConfigService<S: StorageStore> {
    storage: S,
}

impl<S: StorageStore> ConfigService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The stored API key, if one has been saved. Blank values count as
    /// absent.
    pub fn api_key(&self) -> Option<String> {
        self.storage
            .get(API_KEY_KEY)
            .filter(|key| !key.trim().is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }

    pub fn set_api_key(&self, key: &str) -> Result<(), Error> {
        self.storage.set(API_KEY_KEY, key.trim())
    }

    /// The persisted model selection, falling back to the default when
    /// nothing is stored or the stored id is no longer in the catalog.
    pub fn selected_model(&self) -> String {
        match self.storage.get(SELECTED_MODEL_KEY) {
            Some(id) if is_known_model(&id) => id,
            Some(id) => {
                tracing::warn!(model = %id, "ignoring unrecognized stored model selection");
                default_model_id().to_string()
            }
            None => default_model_id().to_string(),
        }
    }

    pub fn set_selected_model(&self, model_id: &str) -> Result<(), Error> {
        self.storage.set(SELECTED_MODEL_KEY, model_id)
    }

    pub fn system_message(&self) -> String {
        self.storage
            .get(SYSTEM_MESSAGE_KEY)
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string())
    }

    pub fn set_system_message(&self, message: &str) -> Result<(), Error> {
        self.storage.set(SYSTEM_MESSAGE_KEY, message)
    }
}
