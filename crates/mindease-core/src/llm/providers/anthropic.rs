//! Anthropic Messages API client

use super::anthropic_stream::anthropic_sse_stream;
use super::error_utils::{check_status, decode_error, send_error};
use super::prompts::DEFAULT_SYSTEM_INSTRUCTION;
use super::provider_trait::CompletionProvider;
use crate::config::ProviderConfig;
use crate::error::{ChatError, ChatResult};
use crate::llm::messages::{ChatMessage, ChatRole, split_system};
use crate::llm::provider_types::ProviderId;
use crate::llm::streaming::CompletionStream;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Client for `POST {base_url}/v1/messages`
pub struct AnthropicProvider {
    api_key: String,
    base_url: String,
    config: ProviderConfig,
    http_client: Client,
}

impl AnthropicProvider {
    pub fn new(config: ProviderConfig, http_client: Client) -> ChatResult<Self> {
        let api_key = config
            .get_api_key()
            .ok_or_else(|| ChatError::config("Claude API key is not configured"))?
            .to_string();
        let base_url = config
            .get_base_url()
            .unwrap_or("https://api.anthropic.com")
            .to_string();

        Ok(Self {
            api_key,
            base_url,
            config,
            http_client,
        })
    }

    /// System messages go into `system`; the conversation must open with a
    /// user turn, so leading assistant turns are dropped.
    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> Value {
        let (system, turns) = split_system(messages);

        let first_user = turns
            .iter()
            .position(|m| m.role == ChatRole::User)
            .unwrap_or(turns.len());
        if first_user > 0 {
            debug!("Dropping {} leading assistant turn(s) for Claude", first_user);
        }

        let turns: Vec<Value> = turns[first_user..]
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "max_tokens": self.config.max_tokens,
            "temperature": self.config.temperature,
            "system": system.unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            "messages": turns,
        });
        if stream {
            body["stream"] = json!(true);
        }
        body
    }

    async fn send(&self, body: &Value) -> ChatResult<reqwest::Response> {
        let url = format!("{}/v1/messages", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", self.config.get_api_version())
            .json(body)
            .send()
            .await
            .map_err(|e| send_error(ProviderId::Claude, e))?;
        check_status(ProviderId::Claude, response).await
    }
}

#[async_trait]
impl CompletionProvider for AnthropicProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Claude
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, messages), level = "debug")]
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(&self.request_body(messages, false)).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| decode_error(ProviderId::Claude, e))?;

        let blocks = json["content"].as_array().ok_or_else(|| {
            ChatError::provider(ProviderId::Claude, "response has no content blocks")
        })?;

        Ok(blocks
            .iter()
            .filter(|block| block["type"] == "text")
            .filter_map(|block| block["text"].as_str())
            .collect::<Vec<_>>()
            .join(""))
    }

    #[instrument(skip(self, messages), level = "debug")]
    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream> {
        let response = self.send(&self.request_body(messages, true)).await?;
        Ok(anthropic_sse_stream(response.bytes_stream()))
    }
}
