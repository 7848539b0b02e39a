use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::models::{Conversation, Role};
use crate::storage::StorageStore;

use super::config_service::ConfigService;

const MESSAGES_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 4000;

/// Anthropic Messages API request
#[derive(Debug, Clone, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<RequestMessage>,
}

/// One turn as sent over the wire: role and content only, no ids or
/// timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestMessage {
    pub role: Role,
    pub content: String,
}

/// Anthropic Messages API response
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[allow(dead_code)]
    id: Option<String>,
    content: Vec<ContentBlock>,
    #[allow(dead_code)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

/// Assemble the provider request for one more user turn in a
/// conversation: prior messages in order, the new user turn last. Pure
/// function, no side effects.
pub fn build_request(
    conversation: &Conversation,
    new_user_text: &str,
    system_prompt: &str,
    model_id: &str,
) -> MessagesRequest {
    let mut messages: Vec<RequestMessage> = conversation
        .messages
        .iter()
        .map(|message| RequestMessage {
            role: message.role,
            content: message.content.clone(),
        })
        .collect();
    messages.push(RequestMessage {
        role: Role::User,
        content: new_user_text.to_string(),
    });

    MessagesRequest {
        model: model_id.to_string(),
        max_tokens: MAX_TOKENS,
        system: system_prompt.to_string(),
        messages,
    }
}

/// Extract the reply text from a response: the first text-bearing content
/// block, or an empty string when there is none. An empty reply is not an
/// error.
fn extract_text(response: &MessagesResponse) -> String {
    response
        .content
        .iter()
        .find(|block| block.kind == "text")
        .and_then(|block| block.text.clone())
        .unwrap_or_default()
}

/// Client for the Anthropic Messages API
pub struct AnthropicClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(api_key, MESSAGES_URL)
    }

    /// Create a client against an explicit endpoint.
    pub fn with_base_url(api_key: &str, base_url: &str) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for long generations
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a client from the stored settings.
    pub fn from_config<S: StorageStore>(config: &ConfigService<S>) -> Result<Self, Error> {
        let api_key = config.api_key().ok_or(Error::MissingApiKey)?;
        Ok(Self::new(&api_key))
    }

    /// Send a messages request and return the reply text.
    pub async fn send(&self, request: &MessagesRequest) -> Result<String, Error> {
        let response = self
            .client
            .post(&self.base_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Provider { status, body });
        }

        let response: MessagesResponse = response.json().await?;
        Ok(extract_text(&response))
    }
}
