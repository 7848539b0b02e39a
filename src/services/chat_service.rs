use crate::storage::StorageStore;

use super::conversation_service::ConversationStore;
use super::llm_client::{build_request, AnthropicClient};

/// Shown in-thread when the provider call fails, so a failed turn stays
/// visible and the user can retry by sending again.
pub const API_ERROR_MESSAGE: &str =
    "Sorry, there was an error processing your message. Please check your API key and try again.";

/// Drive one full chat turn: append the user message, call the provider,
/// and land the reply in the conversation that was active when the turn
/// started. Blank input is ignored.
///
/// Provider and transport failures never propagate; they become the
/// apology message in the affected conversation.
pub async fn send_message<S: StorageStore>(
    store: &mut ConversationStore<S>,
    client: &AnthropicClient,
    system_message: &str,
    model_id: &str,
    text: &str,
) {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return;
    }

    let conversation_id = store.ensure_active();
    let Some(conversation) = store.get(&conversation_id) else {
        return;
    };
    let request = build_request(conversation, trimmed, system_message, model_id);
    store.append_user_message(&conversation_id, trimmed);

    let reply = match client.send(&request).await {
        Ok(reply) => reply,
        Err(err) => {
            tracing::error!(error = %err, "inference request failed");
            API_ERROR_MESSAGE.to_string()
        }
    };

    apply_assistant_reply(store, &conversation_id, &reply);
}

/// Land a completed reply in the conversation captured at request start.
/// If that conversation was deleted while the request was in flight the
/// reply is dropped silently; returns whether the reply was applied.
pub fn apply_assistant_reply<S: StorageStore>(
    store: &mut ConversationStore<S>,
    conversation_id: &str,
    content: &str,
) -> bool {
    if store.get(conversation_id).is_none() {
        tracing::debug!(
            conversation_id,
            "dropping reply for deleted conversation"
        );
        return false;
    }
    store.append_assistant_message(conversation_id, content);
    true
}
