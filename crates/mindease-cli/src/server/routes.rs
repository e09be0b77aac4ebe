use super::error::AppError;
use axum::{
    Router,
    body::{Body, Bytes},
    extract::State,
    http::{HeaderValue, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use futures::{StreamExt, future, stream};
use mindease_core::llm::CompletionStream;
use mindease_core::{ChatMessage, CompletionEvent, CompletionProvider};
use serde::Deserialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn CompletionProvider>,
}

#[derive(Debug, Deserialize)]
struct ChatRequest {
    messages: Option<Vec<ChatMessage>>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/health", get(health))
        .with_state(state)
}

/// POST /api/chat - relay a conversation to the upstream provider
async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, AppError> {
    let messages = serde_json::from_slice::<ChatRequest>(&body)
        .ok()
        .and_then(|request| request.messages)
        .filter(|messages| !messages.is_empty())
        .ok_or(AppError::MessagesRequired)?;

    let upstream = state.upstream.id();
    debug!("Forwarding {} messages to {}", messages.len(), upstream);

    let mut events = state.upstream.chat_stream(&messages).await.map_err(|e| {
        error!("Upstream request failed: {}", e);
        AppError::Upstream
    })?;

    // Hold the status line back until the upstream has produced something
    let first = first_text(&mut events).await?;

    let rest = events
        .inspect(move |event| {
            if let CompletionEvent::Error { detail } = event {
                warn!("{} stream broke after the response started: {}", upstream, detail);
            }
        })
        .take_while(|event| future::ready(matches!(event, CompletionEvent::Chunk { .. })))
        .filter_map(|event| {
            future::ready(match event {
                CompletionEvent::Chunk { text } if !text.is_empty() => Some(text),
                _ => None,
            })
        });

    let body = stream::iter(first)
        .chain(rest)
        .map(|text| Ok::<_, Infallible>(Bytes::from(text)));

    let mut response = Body::from_stream(body).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream"));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}

/// Wait for the first non-empty text. `None` means the upstream finished
/// without any.
async fn first_text(events: &mut CompletionStream) -> Result<Option<String>, AppError> {
    while let Some(event) = events.next().await {
        match event {
            CompletionEvent::Chunk { text } if text.is_empty() => continue,
            CompletionEvent::Chunk { text } => return Ok(Some(text)),
            CompletionEvent::Done { full_text } => {
                return Ok(full_text.filter(|text| !text.is_empty()));
            }
            CompletionEvent::Error { detail } => {
                error!("Upstream stream failed before any text: {}", detail);
                return Err(AppError::Upstream);
            }
        }
    }
    Ok(None)
}

/// GET /api/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "message": "MindEase API is running",
    }))
}
