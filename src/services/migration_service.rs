use crate::models::{derive_title, most_recently_updated, Conversation, Message, NEW_CHAT_TITLE};
use crate::storage::{StorageStore, CONVERSATIONS_KEY, LEGACY_CONVERSATION_KEY};

/// Hydrate the conversation collection from durable storage.
///
/// Handles, in order: the current multi-conversation schema, the legacy
/// single-conversation schema (migrated destructively), and an empty
/// store. Corruption anywhere is discarded and logged; the result is
/// always a non-empty collection plus the id of the conversation to
/// activate.
pub fn hydrate<S: StorageStore>(storage: &S) -> (Vec<Conversation>, String) {
    if let Some(raw) = storage.get(CONVERSATIONS_KEY) {
        match serde_json::from_str::<Vec<Conversation>>(&raw) {
            Ok(conversations) if !conversations.is_empty() => {
                let active_id = pick_active(&conversations);
                return (conversations, active_id);
            }
            Ok(_) => {
                tracing::warn!("stored conversation collection is empty, reinitializing");
                storage.remove(CONVERSATIONS_KEY);
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt conversation collection");
                storage.remove(CONVERSATIONS_KEY);
            }
        }
    }

    if let Some(raw) = storage.get(LEGACY_CONVERSATION_KEY) {
        match serde_json::from_str::<Vec<Message>>(&raw) {
            Ok(messages) => {
                let conversation = wrap_legacy_messages(messages);
                storage.remove(LEGACY_CONVERSATION_KEY);
                let conversations = vec![conversation];
                persist(storage, &conversations);
                let active_id = conversations[0].id.clone();
                tracing::info!("migrated legacy single-conversation storage");
                return (conversations, active_id);
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt legacy conversation");
                storage.remove(LEGACY_CONVERSATION_KEY);
            }
        }
    }

    let conversations = vec![Conversation::new()];
    persist(storage, &conversations);
    let active_id = conversations[0].id.clone();
    (conversations, active_id)
}

/// Wrap a legacy flat message list in a single conversation. The title
/// comes from the first message with non-empty content regardless of
/// role, matching what the old format displayed after import.
fn wrap_legacy_messages(messages: Vec<Message>) -> Conversation {
    let title = messages
        .iter()
        .find(|message| !message.content.is_empty())
        .map(|message| derive_title(&message.content))
        .unwrap_or_else(|| NEW_CHAT_TITLE.to_string());

    let mut conversation = Conversation::new();
    conversation.title = title;
    conversation.messages = messages;
    conversation
}

fn pick_active(conversations: &[Conversation]) -> String {
    most_recently_updated(conversations)
        .map(|conversation| conversation.id.clone())
        .unwrap_or_default()
}

fn persist<S: StorageStore>(storage: &S, conversations: &[Conversation]) {
    match serde_json::to_string(conversations) {
        Ok(json) => {
            if let Err(err) = storage.set(CONVERSATIONS_KEY, &json) {
                tracing::warn!(error = %err, "failed to persist conversations during hydration");
            }
        }
        Err(err) => tracing::warn!(error = %err, "failed to serialize conversations"),
    }
}
