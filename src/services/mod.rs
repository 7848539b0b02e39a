pub mod chat_service;
pub mod config_service;
pub mod conversation_service;
pub mod llm_client;
pub mod migration_service;
pub mod session;

pub use chat_service::{apply_assistant_reply, send_message, API_ERROR_MESSAGE};
pub use config_service::{ConfigService, DEFAULT_SYSTEM_MESSAGE};
pub use conversation_service::ConversationStore;
pub use llm_client::{build_request, AnthropicClient, MessagesRequest, RequestMessage};
pub use session::{
    clear_active_conversation, delete_conversation, ConfirmationPort, CLEAR_CHAT_PROMPT,
    DELETE_CHAT_PROMPT,
};
