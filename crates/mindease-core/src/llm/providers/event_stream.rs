//! Byte stream to [`CompletionEvent`] adapters

use crate::llm::sse_decoder::{SseDecoder, SseEvent};
use crate::llm::streaming::{CompletionEvent, CompletionStream, Utf8Remainder};
use futures::{Stream, StreamExt, stream};
use std::collections::VecDeque;
use std::fmt::Display;
use std::pin::Pin;

type ByteStream<B, E> = Pin<Box<dyn Stream<Item = Result<B, E>> + Send>>;

struct SseState<B, E, F> {
    bytes: ByteStream<B, E>,
    decoder: SseDecoder,
    parse: F,
    pending: VecDeque<CompletionEvent>,
    finished: bool,
}

/// Decode an SSE body, mapping each event through `parse`.
///
/// The stream ends after the first `Done` or `Error`. A body that ends
/// without an explicit terminator is treated as done.
pub(crate) fn sse_completion_stream<S, B, E, F>(bytes: S, parse: F) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
    F: FnMut(&SseEvent) -> Option<CompletionEvent> + Send + 'static,
{
    let state = SseState {
        bytes: Box::pin(bytes),
        decoder: SseDecoder::new(),
        parse,
        pending: VecDeque::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        loop {
            if let Some(event) = st.pending.pop_front() {
                if matches!(event, CompletionEvent::Done { .. } | CompletionEvent::Error { .. }) {
                    st.finished = true;
                    st.pending.clear();
                }
                return Some((event, st));
            }
            if st.finished {
                return None;
            }

            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    for sse in st.decoder.feed(chunk.as_ref()) {
                        if let Some(event) = (st.parse)(&sse) {
                            st.pending.push_back(event);
                        }
                    }
                }
                Some(Err(e)) => st
                    .pending
                    .push_back(CompletionEvent::error(format!("Stream error: {}", e))),
                None => {
                    if let Some(sse) = st.decoder.finish() {
                        if let Some(event) = (st.parse)(&sse) {
                            st.pending.push_back(event);
                        }
                    }
                    st.pending.push_back(CompletionEvent::done());
                }
            }
        }
    }))
}

struct RawState<B, E> {
    bytes: ByteStream<B, E>,
    utf8: Utf8Remainder,
    finished: bool,
}

/// Treat an incrementally written plain-text body as a sequence of deltas
pub(crate) fn raw_text_stream<S, B, E>(bytes: S) -> CompletionStream
where
    S: Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Display + Send + 'static,
{
    let state = RawState {
        bytes: Box::pin(bytes),
        utf8: Utf8Remainder::new(),
        finished: false,
    };

    Box::pin(stream::unfold(state, |mut st| async move {
        if st.finished {
            return None;
        }
        loop {
            match st.bytes.next().await {
                Some(Ok(chunk)) => {
                    let text = st.utf8.push(chunk.as_ref());
                    if !text.is_empty() {
                        return Some((CompletionEvent::chunk(text), st));
                    }
                }
                Some(Err(e)) => {
                    st.finished = true;
                    return Some((CompletionEvent::error(format!("Stream error: {}", e)), st));
                }
                None => {
                    let tail = st.utf8.finish();
                    if !tail.is_empty() {
                        return Some((CompletionEvent::chunk(tail), st));
                    }
                    st.finished = true;
                    return Some((CompletionEvent::done(), st));
                }
            }
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(parts: Vec<&'static [u8]>) -> impl Stream<Item = Result<&'static [u8], String>> + Send {
        stream::iter(parts.into_iter().map(Ok))
    }

    fn data_only(event: &SseEvent) -> Option<CompletionEvent> {
        if event.is_done() {
            Some(CompletionEvent::done())
        } else {
            Some(CompletionEvent::chunk(event.data.clone()))
        }
    }

    #[tokio::test]
    async fn test_sse_stops_after_done() {
        let events: Vec<_> = sse_completion_stream(
            body(vec![b"data: a\n\ndata: [DO", b"NE]\n\ndata: ignored\n\n"]),
            data_only,
        )
        .collect()
        .await;
        assert_eq!(events, vec![CompletionEvent::chunk("a"), CompletionEvent::done()]);
    }

    #[tokio::test]
    async fn test_sse_without_terminator_ends_done() {
        let events: Vec<_> = sse_completion_stream(body(vec![b"data: a\n\ndata: b"]), data_only)
            .collect()
            .await;
        assert_eq!(
            events,
            vec![
                CompletionEvent::chunk("a"),
                CompletionEvent::chunk("b"),
                CompletionEvent::done()
            ]
        );
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let bytes = stream::iter(vec![
            Ok(&b"data: a\n\n"[..]),
            Err("reset".to_string()),
            Ok(&b"data: b\n\n"[..]),
        ]);
        let events: Vec<_> = sse_completion_stream(bytes, data_only).collect().await;
        assert_eq!(
            events,
            vec![CompletionEvent::chunk("a"), CompletionEvent::error("Stream error: reset")]
        );
    }

    #[tokio::test]
    async fn test_raw_text_keeps_split_characters_whole() {
        let bytes = "ñu".as_bytes();
        let parts: Vec<&'static [u8]> = vec![&bytes[..1], &bytes[1..]];
        let events: Vec<_> = raw_text_stream(body(parts)).collect().await;
        assert_eq!(events, vec![CompletionEvent::chunk("ñu"), CompletionEvent::done()]);
    }
}
