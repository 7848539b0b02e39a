use chrono::Utc;

use crate::models::{
    derive_title, most_recently_updated, Conversation, ConversationListItem, Message,
    NEW_CHAT_TITLE,
};
use crate::storage::{StorageStore, CONVERSATIONS_KEY};

use super::migration_service;

/// Owns the conversation collection and the active selection.
///
/// Every mutation is an atomic in-memory transition followed by a
/// write-through of the full collection to the storage port. Once loaded
/// the collection is never empty: deleting the last conversation
/// synthesizes a fresh one in the same step.
pub struct ConversationStore<S: StorageStore> {
    conversations: Vec<Conversation>,
    active_id: String,
    storage: S,
}

impl<S: StorageStore> ConversationStore<S> {
    /// Hydrate from durable storage, running schema migration if needed.
    pub fn load(storage: S) -> Self {
        let (conversations, active_id) = migration_service::hydrate(&storage);
        Self {
            conversations,
            active_id,
            storage,
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Conversation summaries in iteration order, for a sidebar listing.
    pub fn list(&self) -> Vec<ConversationListItem> {
        self.conversations.iter().map(Into::into).collect()
    }

    pub fn active_id(&self) -> &str {
        &self.active_id
    }

    pub fn active(&self) -> Option<&Conversation> {
        self.get(&self.active_id)
    }

    pub fn get(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    /// The id of the active conversation, creating and activating a fresh
    /// one if the current selection no longer resolves. Idempotent when a
    /// valid selection exists.
    pub fn ensure_active(&mut self) -> String {
        if self.get(&self.active_id).is_some() {
            return self.active_id.clone();
        }
        self.start_new()
    }

    /// Create an empty conversation at the front of the list and make it
    /// active.
    pub fn start_new(&mut self) -> String {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_id = id.clone();
        self.persist();
        id
    }

    /// Make `id` the active conversation. The id must come from the
    /// current listing; passing an unknown id is a caller bug.
    pub fn select(&mut self, id: &str) {
        debug_assert!(self.get(id).is_some(), "select of unknown conversation id");
        self.active_id = id.to_string();
        self.persist();
    }

    /// Remove a conversation. The store re-activates the most recently
    /// updated survivor, or synthesizes a fresh conversation when the
    /// collection would become empty.
    pub fn delete(&mut self, id: &str) {
        self.conversations.retain(|c| c.id != id);

        if self.conversations.is_empty() {
            let conversation = Conversation::new();
            self.active_id = conversation.id.clone();
            self.conversations.push(conversation);
        } else if self.active_id == id {
            if let Some(next) = most_recently_updated(&self.conversations) {
                self.active_id = next.id.clone();
            }
        }
        self.persist();
    }

    /// Append a user turn. Blank text is rejected. Derives the title from
    /// the text if the conversation still carries the sentinel.
    pub fn append_user_message(&mut self, conversation_id: &str, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        let Some(conversation) = self.get_mut(conversation_id) else {
            tracing::warn!(conversation_id, "append_user_message to unknown conversation");
            return;
        };
        conversation.messages.push(Message::user(trimmed));
        if conversation.title == NEW_CHAT_TITLE {
            conversation.title = derive_title(trimmed);
        }
        conversation.updated_at = Utc::now();
        self.persist();
    }

    /// Append an assistant turn. Empty content is allowed; the title is
    /// never touched.
    pub fn append_assistant_message(&mut self, conversation_id: &str, text: &str) {
        let Some(conversation) = self.get_mut(conversation_id) else {
            tracing::warn!(
                conversation_id,
                "append_assistant_message to unknown conversation"
            );
            return;
        };
        conversation.messages.push(Message::assistant(text));
        conversation.updated_at = Utc::now();
        self.persist();
    }

    /// Empty a conversation and reset its title to the sentinel.
    pub fn clear(&mut self, conversation_id: &str) {
        let Some(conversation) = self.get_mut(conversation_id) else {
            tracing::warn!(conversation_id, "clear of unknown conversation");
            return;
        };
        conversation.messages.clear();
        conversation.title = NEW_CHAT_TITLE.to_string();
        conversation.updated_at = Utc::now();
        self.persist();
    }

    /// Write the full collection through to storage. A failed write is
    /// logged and the in-memory state kept; the next successful write
    /// restores durability.
    fn persist(&self) {
        match serde_json::to_string(&self.conversations) {
            Ok(json) => {
                if let Err(err) = self.storage.set(CONVERSATIONS_KEY, &json) {
                    tracing::warn!(error = %err, "failed to persist conversations");
                }
            }
            Err(err) => tracing::warn!(error = %err, "failed to serialize conversations"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::TimeZone;

    fn fresh_store() -> ConversationStore<MemoryStore> {
        ConversationStore::load(MemoryStore::new())
    }

    fn persisted(storage: &MemoryStore) -> Vec<Conversation> {
        serde_json::from_str(&storage.get(CONVERSATIONS_KEY).unwrap()).unwrap()
    }

    #[test]
    fn load_initializes_with_one_active_conversation() {
        let store = fresh_store();
        assert_eq!(store.conversations().len(), 1);
        assert_eq!(store.active().unwrap().title, NEW_CHAT_TITLE);
    }

    #[test]
    fn ensure_active_is_idempotent_with_valid_selection() {
        let mut store = fresh_store();
        let first = store.ensure_active();
        let second = store.ensure_active();
        assert_eq!(first, second);
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn start_new_inserts_at_front_and_activates() {
        let mut store = fresh_store();
        let original = store.active_id().to_string();
        let new_id = store.start_new();

        assert_eq!(store.conversations()[0].id, new_id);
        assert_eq!(store.active_id(), new_id);
        assert!(store.get(&original).is_some());
    }

    #[test]
    fn select_switches_active_conversation() {
        let mut store = fresh_store();
        let first = store.active_id().to_string();
        store.start_new();
        store.select(&first);
        assert_eq!(store.active_id(), first);
    }

    #[test]
    fn user_message_sets_title_once() {
        let mut store = fresh_store();
        let id = store.ensure_active();

        store.append_user_message(&id, "Plan a trip to Lisbon");
        assert_eq!(store.get(&id).unwrap().title, "Plan a trip to Lisbon");

        store.append_user_message(&id, "Actually make it Porto");
        assert_eq!(store.get(&id).unwrap().title, "Plan a trip to Lisbon");
    }

    #[test]
    fn user_message_title_is_truncated_to_forty_chars() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        let long: String = "y".repeat(60);

        store.append_user_message(&id, &long);
        assert_eq!(store.get(&id).unwrap().title.chars().count(), 40);
    }

    #[test]
    fn blank_user_message_is_rejected() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        store.append_user_message(&id, "   \n");
        assert!(store.get(&id).unwrap().messages.is_empty());
        assert_eq!(store.get(&id).unwrap().title, NEW_CHAT_TITLE);
    }

    #[test]
    fn assistant_message_never_touches_title() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        store.append_assistant_message(&id, "Hello there");
        assert_eq!(store.get(&id).unwrap().title, NEW_CHAT_TITLE);
        assert_eq!(store.get(&id).unwrap().messages.len(), 1);
    }

    #[test]
    fn assistant_message_with_empty_content_is_allowed() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        store.append_assistant_message(&id, "");
        assert_eq!(store.get(&id).unwrap().messages.len(), 1);
    }

    #[test]
    fn mutations_refresh_updated_at() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        let before = store.get(&id).unwrap().updated_at;
        store.append_user_message(&id, "hi");
        let after = store.get(&id).unwrap().updated_at;
        assert!(after >= before);
        assert!(after >= store.get(&id).unwrap().created_at);
    }

    #[test]
    fn deleting_last_conversation_synthesizes_a_fresh_one() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        store.append_user_message(&id, "hello");

        store.delete(&id);

        assert_eq!(store.conversations().len(), 1);
        let replacement = store.active().unwrap();
        assert_ne!(replacement.id, id);
        assert_eq!(replacement.title, NEW_CHAT_TITLE);
        assert!(replacement.messages.is_empty());
    }

    #[test]
    fn deleting_active_activates_most_recently_updated_survivor() {
        let mut store = fresh_store();
        let oldest = store.active_id().to_string();
        let middle = store.start_new();
        let newest = store.start_new();

        // Force a known recency ordering.
        store.get_mut(&oldest).unwrap().updated_at = chrono::Utc.timestamp_opt(100, 0).unwrap();
        store.get_mut(&middle).unwrap().updated_at = chrono::Utc.timestamp_opt(300, 0).unwrap();
        store.get_mut(&newest).unwrap().updated_at = chrono::Utc.timestamp_opt(200, 0).unwrap();

        store.select(&newest);
        store.delete(&newest);

        assert_eq!(store.active_id(), middle);
        assert_eq!(store.conversations().len(), 2);
    }

    #[test]
    fn deleting_inactive_conversation_keeps_selection() {
        let mut store = fresh_store();
        let first = store.active_id().to_string();
        let second = store.start_new();

        store.delete(&first);

        assert_eq!(store.active_id(), second);
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn collection_is_never_empty_across_churn() {
        let mut store = fresh_store();
        for _ in 0..5 {
            store.start_new();
        }
        let ids: Vec<String> = store
            .conversations()
            .iter()
            .map(|c| c.id.clone())
            .collect();
        for id in ids {
            store.delete(&id);
            assert!(!store.conversations().is_empty());
        }
        // All originals gone, exactly one synthesized replacement left.
        assert_eq!(store.conversations().len(), 1);
    }

    #[test]
    fn clear_empties_messages_and_resets_title() {
        let mut store = fresh_store();
        let id = store.ensure_active();
        store.append_user_message(&id, "Remember this");
        store.append_assistant_message(&id, "Noted");

        store.clear(&id);

        let conversation = store.get(&id).unwrap();
        assert!(conversation.messages.is_empty());
        assert_eq!(conversation.title, NEW_CHAT_TITLE);
    }

    #[test]
    fn every_mutation_writes_through_to_storage() {
        let storage = MemoryStore::new();
        let mut store = ConversationStore::load(storage.clone());
        let id = store.ensure_active();

        store.append_user_message(&id, "persist me");
        let on_disk = persisted(&storage);
        assert_eq!(on_disk[0].messages.len(), 1);
        assert_eq!(on_disk[0].messages[0].content, "persist me");

        store.clear(&id);
        let on_disk = persisted(&storage);
        assert!(on_disk[0].messages.is_empty());
    }

    #[test]
    fn reload_after_mutations_restores_identical_state() {
        let storage = MemoryStore::new();
        let mut store = ConversationStore::load(storage.clone());
        let id = store.ensure_active();
        store.append_user_message(&id, "Hello world");
        store.append_assistant_message(&id, "Hi!");
        let before: Vec<Conversation> = store.conversations().to_vec();

        let reloaded = ConversationStore::load(storage);
        let after = reloaded.conversations();
        assert_eq!(after.len(), before.len());
        assert_eq!(after[0].id, before[0].id);
        assert_eq!(after[0].title, before[0].title);
        assert_eq!(after[0].updated_at, before[0].updated_at);
        assert_eq!(after[0].messages.len(), 2);
        assert_eq!(reloaded.active_id(), id);
    }

    #[test]
    fn list_reports_summaries_in_iteration_order() {
        let mut store = fresh_store();
        let first = store.active_id().to_string();
        store.append_user_message(&first, "alpha");
        let second = store.start_new();

        let listing = store.list();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, second);
        assert_eq!(listing[1].id, first);
        assert_eq!(listing[1].message_count, 1);
        assert_eq!(listing[1].title, "alpha");
    }
}
