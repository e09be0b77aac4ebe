//! OpenAI-compatible SSE payloads
//!
//! Shared by DeepSeek and OpenAI: `data:` lines carry
//! `choices[0].delta.content` and the stream ends with `[DONE]`.

use crate::error::sanitize_provider_error_text;
use crate::llm::sse_decoder::SseEvent;
use crate::llm::streaming::{CompletionEvent, CompletionStream};
use futures::Stream;
use serde_json::Value;

use super::event_stream::sse_completion_stream;

/// Map one SSE event to a completion event
pub fn parse_openai_event(event: &SseEvent) -> Option<CompletionEvent> {
    if event.is_done() {
        return Some(CompletionEvent::done());
    }

    let json: Value = match serde_json::from_str(&event.data) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Skipping malformed stream payload: {}", e);
            return None;
        }
    };

    if !json["error"].is_null() {
        return Some(CompletionEvent::error(sanitize_provider_error_text(&event.data)));
    }

    json["choices"][0]["delta"]["content"]
        .as_str()
        .filter(|content| !content.is_empty())
        .map(CompletionEvent::chunk)
}

pub fn openai_sse_stream<S, B, E>(bytes: S) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    sse_completion_stream(bytes, parse_openai_event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_content() {
        let event = SseEvent::new(r#"{"choices":[{"index":0,"delta":{"content":"Hi"}}]}"#);
        assert_eq!(parse_openai_event(&event), Some(CompletionEvent::chunk("Hi")));
    }

    #[test]
    fn test_role_only_delta_skipped() {
        let event = SseEvent::new(r#"{"choices":[{"index":0,"delta":{"role":"assistant"}}]}"#);
        assert_eq!(parse_openai_event(&event), None);
        let event = SseEvent::new(r#"{"choices":[{"delta":{"content":""},"finish_reason":"stop"}]}"#);
        assert_eq!(parse_openai_event(&event), None);
    }

    #[test]
    fn test_done_and_error() {
        assert_eq!(
            parse_openai_event(&SseEvent::new("[DONE]")),
            Some(CompletionEvent::done())
        );
        let event = SseEvent::new(r#"{"error":{"message":"overloaded"}}"#);
        assert_eq!(
            parse_openai_event(&event),
            Some(CompletionEvent::error("overloaded"))
        );
    }

    #[test]
    fn test_malformed_payload_skipped() {
        assert_eq!(parse_openai_event(&SseEvent::new("{not json")), None);
    }
}
