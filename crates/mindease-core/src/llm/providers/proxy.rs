//! Client for a MindEase proxy server
//!
//! The proxy takes `{messages}` on `POST /api/chat` and answers with the
//! concatenated reply written incrementally as plain text. Errors are only
//! ever reported before the first body byte, as JSON `{error}`. Like the
//! other clients it supplies the default instruction when the conversation
//! carries no system message.

use super::error_utils::{decode_error, send_error};
use super::event_stream::raw_text_stream;
use super::prompts::with_default_instruction;
use super::provider_trait::CompletionProvider;
use crate::config::ProviderConfig;
use crate::error::{ChatError, ChatResult, sanitize_provider_error_text};
use crate::llm::messages::ChatMessage;
use crate::llm::provider_types::ProviderId;
use crate::llm::streaming::CompletionStream;
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{Value, json};
use tracing::instrument;

pub struct ProxyProvider {
    endpoint: String,
    http_client: Client,
}

impl ProxyProvider {
    /// `config.base_url` is the proxy origin, e.g. `http://localhost:5001`
    pub fn new(config: &ProviderConfig, http_client: Client) -> ChatResult<Self> {
        let base_url = config
            .get_base_url()
            .ok_or_else(|| ChatError::config("MindEase proxy URL is not configured"))?;
        Ok(Self {
            endpoint: format!("{}/api/chat", base_url),
            http_client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, messages: &[ChatMessage]) -> ChatResult<Response> {
        let response = self
            .http_client
            .post(&self.endpoint)
            .json(&json!({ "messages": with_default_instruction(messages) }))
            .send()
            .await
            .map_err(|e| send_error(ProviderId::Proxy, e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|json| json["error"].as_str().map(str::to_string))
            .unwrap_or_else(|| sanitize_provider_error_text(&body));
        Err(ChatError::provider_with_status(
            ProviderId::Proxy,
            format!("API error (status {}): {}", status.as_u16(), detail),
            status.as_u16(),
        ))
    }
}

#[async_trait]
impl CompletionProvider for ProxyProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Proxy
    }

    /// The proxy decides the model
    fn model(&self) -> &str {
        "proxy"
    }

    #[instrument(skip(self, messages), level = "debug")]
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
        let response = self.send(messages).await?;
        response
            .text()
            .await
            .map_err(|e| decode_error(ProviderId::Proxy, e))
    }

    #[instrument(skip(self, messages), level = "debug")]
    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream> {
        let response = self.send(messages).await?;
        Ok(raw_text_stream(response.bytes_stream()))
    }
}
