//! Anthropic Messages API stream events

use crate::error::sanitize_provider_error_text;
use crate::llm::sse_decoder::SseEvent;
use crate::llm::streaming::{CompletionEvent, CompletionStream};
use futures::Stream;
use serde_json::Value;

use super::event_stream::sse_completion_stream;

/// Map one SSE event to a completion event.
///
/// Only text deltas, `message_stop` and `error` matter; `message_start`,
/// `content_block_start`, `ping` and friends are skipped.
pub fn parse_anthropic_event(event: &SseEvent) -> Option<CompletionEvent> {
    let json: Value = match serde_json::from_str(&event.data) {
        Ok(json) => json,
        Err(e) => {
            tracing::warn!("Skipping malformed Anthropic stream payload: {}", e);
            return None;
        }
    };

    let event_type = event
        .event_type
        .as_deref()
        .or_else(|| json["type"].as_str())
        .unwrap_or_default();

    match event_type {
        "content_block_delta" => {
            let delta = &json["delta"];
            if delta["type"].as_str() != Some("text_delta") {
                return None;
            }
            delta["text"]
                .as_str()
                .filter(|text| !text.is_empty())
                .map(CompletionEvent::chunk)
        }
        "message_stop" => Some(CompletionEvent::done()),
        "error" => Some(CompletionEvent::error(sanitize_provider_error_text(
            &event.data,
        ))),
        _ => None,
    }
}

pub fn anthropic_sse_stream<S, B, E>(bytes: S) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::fmt::Display + Send + 'static,
{
    sse_completion_stream(bytes, parse_anthropic_event)
}
