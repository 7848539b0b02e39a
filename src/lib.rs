//! Conversation state and persistence core for a Claude chat client.
//!
//! The crate models multiple named conversations, persists them
//! write-through to an injected key-value store, migrates the legacy
//! single-conversation format on first load, and shapes requests for the
//! Anthropic Messages API. Rendering, input handling, and markdown are
//! the embedding application's concern; it consumes this crate's types
//! and operations.

pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::Error;
pub use models::{Conversation, ConversationListItem, Message, Role};
pub use services::{ConfigService, ConversationStore};
pub use storage::{FileStore, MemoryStore, StorageStore};
