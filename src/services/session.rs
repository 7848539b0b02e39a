use crate::storage::StorageStore;

use super::conversation_service::ConversationStore;

pub const DELETE_CHAT_PROMPT: &str = "Are you sure you want to delete this chat?";
pub const CLEAR_CHAT_PROMPT: &str = "Are you sure you want to clear the chat?";

/// Asks the user to confirm a destructive action. Injected so delete and
/// clear are testable without a real dialog.
pub trait ConfirmationPort {
    fn confirm(&self, message: &str) -> bool;
}

/// Delete a conversation after user confirmation. Returns whether the
/// deletion happened.
pub fn delete_conversation<S: StorageStore, C: ConfirmationPort>(
    store: &mut ConversationStore<S>,
    confirmation: &C,
    conversation_id: &str,
) -> bool {
    if !confirmation.confirm(DELETE_CHAT_PROMPT) {
        return false;
    }
    store.delete(conversation_id);
    true
}

/// Clear the active conversation after user confirmation. A conversation
/// with no messages is left alone without prompting. Returns whether the
/// clear happened.
pub fn clear_active_conversation<S: StorageStore, C: ConfirmationPort>(
    store: &mut ConversationStore<S>,
    confirmation: &C,
) -> bool {
    let Some(active) = store.active() else {
        return false;
    };
    if active.messages.is_empty() {
        return false;
    }
    let conversation_id = active.id.clone();
    if !confirmation.confirm(CLEAR_CHAT_PROMPT) {
        return false;
    }
    store.clear(&conversation_id);
    true
}
