//! Streaming completion events and accumulation

use crate::error::{ChatError, ChatResult};
use crate::llm::provider_types::ProviderId;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use tracing::{debug, warn};

/// One event of a provider's streamed answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CompletionEvent {
    /// Incremental text delta
    Chunk { text: String },
    /// End of the answer. Some providers report the whole text here.
    Done { full_text: Option<String> },
    /// Transport or provider failure mid-stream
    Error { detail: String },
}

impl CompletionEvent {
    pub fn chunk(text: impl Into<String>) -> Self {
        CompletionEvent::Chunk { text: text.into() }
    }

    pub fn done() -> Self {
        CompletionEvent::Done { full_text: None }
    }

    pub fn done_with(full_text: impl Into<String>) -> Self {
        CompletionEvent::Done {
            full_text: Some(full_text.into()),
        }
    }

    pub fn error(detail: impl Into<String>) -> Self {
        CompletionEvent::Error {
            detail: detail.into(),
        }
    }
}

/// Stream of completion events
pub type CompletionStream = Pin<Box<dyn Stream<Item = CompletionEvent> + Send>>;

/// Receives the cumulative text so far each time it grows
pub type PartialCallback<'a> = dyn Fn(&str) + Send + Sync + 'a;

/// Builds the cumulative answer from deltas.
///
/// Every snapshot handed out is a prefix of the next one.
#[derive(Debug, Default, Clone)]
pub struct StreamAccumulator {
    text: String,
}

impl StreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delta. Returns `false` for empty deltas, which change nothing.
    pub fn push_delta(&mut self, delta: &str) -> bool {
        if delta.is_empty() {
            return false;
        }
        self.text.push_str(delta);
        true
    }

    /// Reconcile with a provider-reported final text.
    ///
    /// Returns `true` when the accumulated text grew. A final text that does
    /// not extend what was already shown is ignored.
    pub fn reconcile_final(&mut self, full_text: &str) -> bool {
        if full_text.len() > self.text.len() && full_text.starts_with(&self.text) {
            self.text = full_text.to_string();
            true
        } else {
            if full_text != self.text {
                warn!(
                    "Final text does not extend streamed text ({} vs {} bytes), keeping streamed text",
                    full_text.len(),
                    self.text.len()
                );
            }
            false
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// Drain a completion stream into the final answer.
///
/// `on_partial` sees the cumulative text after every non-empty delta. An
/// answer that ends up empty is reported as [`ChatError::EmptyResponse`].
pub async fn collect_stream(
    provider: ProviderId,
    mut stream: CompletionStream,
    on_partial: Option<&PartialCallback<'_>>,
) -> ChatResult<String> {
    let mut acc = StreamAccumulator::new();
    let notify = |acc: &StreamAccumulator| {
        if let Some(cb) = on_partial {
            cb(acc.text());
        }
    };

    while let Some(event) = stream.next().await {
        match event {
            CompletionEvent::Chunk { text } => {
                if acc.push_delta(&text) {
                    notify(&acc);
                }
            }
            CompletionEvent::Done { full_text } => {
                if let Some(full) = full_text {
                    if acc.reconcile_final(&full) {
                        notify(&acc);
                    }
                }
                break;
            }
            CompletionEvent::Error { detail } => {
                return Err(ChatError::stream(format!(
                    "{} stream failed after {} bytes: {}",
                    provider.display_name(),
                    acc.text().len(),
                    detail
                )));
            }
        }
    }

    if acc.is_empty() {
        return Err(ChatError::empty_response(provider));
    }
    debug!("{} streamed {} bytes", provider, acc.text().len());
    Ok(acc.into_text())
}

/// Decodes UTF-8 text from arbitrarily split byte chunks.
///
/// Trailing bytes of an incomplete character are held back until the next
/// chunk arrives.
#[derive(Debug, Default)]
pub struct Utf8Remainder {
    pending: Vec<u8>,
}

impl Utf8Remainder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `pending + chunk` as forms complete characters
    pub fn push(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let bytes = std::mem::take(&mut self.pending);

        match std::str::from_utf8(&bytes) {
            Ok(s) => s.to_string(),
            Err(e) => {
                let valid = e.valid_up_to();
                match e.error_len() {
                    // Incomplete sequence at the end: keep it for later.
                    None => {
                        self.pending = bytes[valid..].to_vec();
                        String::from_utf8_lossy(&bytes[..valid]).into_owned()
                    }
                    // Invalid bytes in the middle: replace them.
                    Some(_) => String::from_utf8_lossy(&bytes).into_owned(),
                }
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flush whatever is held back, lossily
    pub fn finish(&mut self) -> String {
        let bytes = std::mem::take(&mut self.pending);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}
