//! Provider trait

use crate::error::{ChatError, ChatResult};
use crate::llm::messages::ChatMessage;
use crate::llm::provider_types::ProviderId;
use crate::llm::streaming::{CompletionStream, PartialCallback, collect_stream};
use async_trait::async_trait;

/// A hosted model that can answer a conversation.
///
/// Implementations issue exactly one outbound request per call and never
/// retry; falling back is the router's job.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    fn id(&self) -> ProviderId;

    fn model(&self) -> &str;

    /// Buffered request/response exchange
    async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String>;

    /// Streaming request. Fails before returning when the upstream rejects
    /// the request; later failures arrive as [`CompletionEvent::Error`].
    ///
    /// [`CompletionEvent::Error`]: crate::llm::CompletionEvent::Error
    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream>;

    /// Complete a conversation.
    ///
    /// Streams when `on_partial` is given, calling it with the cumulative
    /// text after every received delta; the last call carries the returned
    /// text. An empty answer is an error.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        on_partial: Option<&PartialCallback<'_>>,
    ) -> ChatResult<String> {
        match on_partial {
            Some(callback) => {
                let stream = self.chat_stream(messages).await?;
                collect_stream(self.id(), stream, Some(callback)).await
            }
            None => {
                let text = self.chat(messages).await?;
                if text.is_empty() {
                    return Err(ChatError::empty_response(self.id()));
                }
                Ok(text)
            }
        }
    }
}
