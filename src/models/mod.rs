mod claude_models;
mod conversation;
mod message;

pub use claude_models::*;
pub use conversation::*;
pub use message::*;
