//! Incremental Server-Sent Events decoder
//!
//! Bytes arrive in arbitrary pieces. Lines are only interpreted once their
//! terminator has been seen, and an event is dispatched on the blank line
//! that ends it. Comment lines (`:`), `id:` and `retry:` are ignored.

mod event;

pub use event::SseEvent;

use crate::llm::streaming::Utf8Remainder;

#[derive(Debug, Default)]
pub struct SseDecoder {
    utf8: Utf8Remainder,
    /// Text of the current, unterminated line
    line: String,
    event_type: Option<String>,
    data: Vec<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw bytes and return every event completed by them
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseEvent> {
        let text = self.utf8.push(chunk);
        let mut events = Vec::new();

        for ch in text.chars() {
            if ch == '\n' {
                let line = std::mem::take(&mut self.line);
                let line = line.strip_suffix('\r').unwrap_or(&line);
                if let Some(event) = self.process_line(line) {
                    events.push(event);
                }
            } else {
                self.line.push(ch);
            }
        }

        events
    }

    /// Flush a trailing event that was not followed by a blank line
    pub fn finish(&mut self) -> Option<SseEvent> {
        let tail = self.utf8.finish();
        self.line.push_str(&tail);
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            let line = line.strip_suffix('\r').unwrap_or(&line).to_string();
            if let Some(event) = self.process_line(&line) {
                return Some(event);
            }
        }
        self.dispatch()
    }

    pub fn has_remaining(&self) -> bool {
        !self.line.is_empty() || !self.data.is_empty() || self.utf8.has_pending()
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "event" => self.event_type = Some(value.to_string()),
            "data" => self.data.push(value.to_string()),
            _ => {}
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        let event_type = self.event_type.take();
        if self.data.is_empty() {
            return None;
        }
        let data = std::mem::take(&mut self.data).join("\n");
        Some(SseEvent { event_type, data })
    }
}
