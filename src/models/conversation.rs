use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;

/// Placeholder title until a real one can be derived from user content.
pub const NEW_CHAT_TITLE: &str = "New chat";

/// Maximum length of a derived title, in characters.
pub const TITLE_MAX_CHARS: usize = 40;

/// One independent chat thread.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Create an empty conversation with the sentinel title.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: NEW_CHAT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a conversation for listing in a sidebar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationListItem {
    pub id: String,
    pub title: String,
    pub message_count: usize,
    pub updated_at: DateTime<Utc>,
}

impl From<&Conversation> for ConversationListItem {
    fn from(conversation: &Conversation) -> Self {
        Self {
            id: conversation.id.clone(),
            title: conversation.title.clone(),
            message_count: conversation.messages.len(),
            updated_at: conversation.updated_at,
        }
    }
}

/// Derive a display title from message content: trimmed, truncated to
/// `TITLE_MAX_CHARS` characters. Blank input yields the sentinel.
pub fn derive_title(content: &str) -> String {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return NEW_CHAT_TITLE.to_string();
    }
    trimmed.chars().take(TITLE_MAX_CHARS).collect()
}

/// The conversation with the latest `updated_at`. Ties go to the earliest
/// occurrence in the slice, so the result is deterministic.
pub fn most_recently_updated(conversations: &[Conversation]) -> Option<&Conversation> {
    let mut best: Option<&Conversation> = None;
    for conversation in conversations {
        match best {
            Some(current) if conversation.updated_at <= current.updated_at => {}
            _ => best = Some(conversation),
        }
    }
    best
}
