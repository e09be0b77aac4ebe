//! OpenAI-compatible chat completions client (DeepSeek, OpenAI)

use super::error_utils::{check_status, decode_error, send_error};
use super::openai_stream::openai_sse_stream;
use super::prompts::with_default_instruction;
use super::provider_trait::CompletionProvider;
use crate::config::ProviderConfig;
use crate::error::{ChatError, ChatResult};
use crate::llm::messages::ChatMessage;
use crate::llm::provider_types::ProviderId;
use crate::llm::streaming::CompletionStream;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::instrument;

/// Client for `POST {base_url}/chat/completions`
pub struct OpenAiProvider {
    id: ProviderId,
    api_key: String,
    base_url: String,
    config: ProviderConfig,
    http_client: Client,
}

impl OpenAiProvider {
    /// Requires an API key and a base URL in `config`
    pub fn new(id: ProviderId, config: ProviderConfig, http_client: Client) -> ChatResult<Self> {
        let api_key = config
            .get_api_key()
            .ok_or_else(|| ChatError::config(format!("{} API key is not configured", id.display_name())))?
            .to_string();
        let base_url = config
            .get_base_url()
            .ok_or_else(|| ChatError::config(format!("{} base URL is not configured", id.display_name())))?
            .to_string();

        Ok(Self {
            id,
            api_key,
            base_url,
            config,
            http_client,
        })
    }

    fn request_body(&self, messages: &[ChatMessage], stream: bool) -> Value {
        let messages: Vec<Value> = with_default_instruction(messages)
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let mut body = json!({
            "model": self.config.model,
            "messages": messages,
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });
        if stream {
            body["stream"] = json!(true);
        }
        body
    }

    async fn send(&self, body: &Value) -> ChatResult<reqwest::Response> {
        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| send_error(self.id, e))?;
        check_status(self.id, response).await
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    fn id(&self) -> ProviderId {
        self.id
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, messages), fields(provider = %self.id), level = "debug")]
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(&self.request_body(messages, false)).await?;
        let json: Value = response
            .json()
            .await
            .map_err(|e| decode_error(self.id, e))?;

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                ChatError::provider(self.id, "response has no choices[0].message.content")
            })
    }

    #[instrument(skip(self, messages), fields(provider = %self.id), level = "debug")]
    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream> {
        let response = self.send(&self.request_body(messages, true)).await?;
        Ok(openai_sse_stream(response.bytes_stream()))
    }
}
