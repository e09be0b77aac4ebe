use super::error::{MESSAGES_REQUIRED, UPSTREAM_FAILED};
use super::*;
use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use futures::stream;
use mindease_core::config::ProviderConfig;
use mindease_core::llm::CompletionStream;
use mindease_core::{ChatError, ChatMessage, ChatResult, CompletionEvent, CompletionProvider, ProviderId};
use parking_lot::Mutex;
use std::sync::Arc;
use tower::ServiceExt;

enum Script {
    Events(Vec<CompletionEvent>),
    Reject,
}

struct ScriptedUpstream {
    script: Script,
    received: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedUpstream {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            received: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CompletionProvider for ScriptedUpstream {
    fn id(&self) -> ProviderId {
        ProviderId::DeepSeek
    }

    fn model(&self) -> &str {
        "deepseek-chat"
    }

    async fn chat(&self, _messages: &[ChatMessage]) -> ChatResult<String> {
        Err(ChatError::provider(ProviderId::DeepSeek, "buffered calls are not used"))
    }

    async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream> {
        self.received.lock().push(messages.to_vec());
        match &self.script {
            Script::Events(events) => Ok(Box::pin(stream::iter(events.clone()))),
            Script::Reject => Err(ChatError::provider_with_status(
                ProviderId::DeepSeek,
                "API error (status 401): invalid key",
                401,
            )),
        }
    }
}

fn app(upstream: Arc<ScriptedUpstream>) -> Router {
    create_router(AppState { upstream })
}

fn post_chat(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn read_body(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health() {
    let upstream = ScriptedUpstream::new(Script::Events(vec![]));
    let response = app(upstream)
        .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(
        json,
        serde_json::json!({"status": "ok", "message": "MindEase API is running"})
    );
}

#[tokio::test]
async fn test_relays_chunks_as_raw_text() {
    let upstream = ScriptedUpstream::new(Script::Events(vec![
        CompletionEvent::chunk("Hello"),
        CompletionEvent::chunk(""),
        CompletionEvent::chunk(", friend"),
        CompletionEvent::done(),
        CompletionEvent::chunk("ignored"),
    ]));
    let response = app(upstream.clone())
        .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/event-stream"
    );
    assert_eq!(response.headers()[header::CACHE_CONTROL], "no-cache");
    assert_eq!(read_body(response).await, "Hello, friend");
    assert_eq!(upstream.received.lock()[0], vec![ChatMessage::user("hi")]);
}

#[tokio::test]
async fn test_missing_messages_is_bad_request() {
    for body in [r#"{}"#, r#"{"messages":[]}"#, r#"{"messages":"hi"}"#, "not json"] {
        let upstream = ScriptedUpstream::new(Script::Events(vec![]));
        let response = app(upstream.clone()).oneshot(post_chat(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {body}");
        let json: serde_json::Value = serde_json::from_str(&read_body(response).await).unwrap();
        assert_eq!(json["error"], MESSAGES_REQUIRED);
        assert!(upstream.received.lock().is_empty());
    }
}

#[tokio::test]
async fn test_upstream_rejection_is_server_error() {
    let upstream = ScriptedUpstream::new(Script::Reject);
    let response = app(upstream)
        .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: serde_json::Value = serde_json::from_str(&read_body(response).await).unwrap();
    assert_eq!(json, serde_json::json!({ "error": UPSTREAM_FAILED }));
}

#[tokio::test]
async fn test_stream_error_before_text_is_server_error() {
    let upstream = ScriptedUpstream::new(Script::Events(vec![
        CompletionEvent::chunk(""),
        CompletionEvent::error("connection reset"),
    ]));
    let response = app(upstream)
        .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_stream_error_after_text_ends_body() {
    let upstream = ScriptedUpstream::new(Script::Events(vec![
        CompletionEvent::chunk("I hear "),
        CompletionEvent::chunk("you"),
        CompletionEvent::error("connection reset"),
        CompletionEvent::chunk("never sent"),
    ]));
    let response = app(upstream)
        .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_body(response).await, "I hear you");
}

#[tokio::test]
async fn test_final_text_without_deltas_is_sent() {
    let upstream = ScriptedUpstream::new(Script::Events(vec![CompletionEvent::done_with(
        "Take a slow breath.",
    )]));
    let response = app(upstream)
        .oneshot(post_chat(r#"{"messages":[{"role":"user","content":"hi"}]}"#))
        .await
        .unwrap();
    assert_eq!(read_body(response).await, "Take a slow breath.");
}

#[test]
fn test_refuses_to_start_without_credential() {
    let mut config = mindease_core::AppConfig::default();
    config.server.upstream = ProviderId::DeepSeek;
    config.providers.deepseek = ProviderConfig::for_provider(ProviderId::DeepSeek);

    let err = ProxyServer::from_config(&config).err().unwrap();
    assert!(err.to_string().contains("DEEPSEEK_API_KEY"));
}

#[test]
fn test_builds_with_credential() {
    let mut config = mindease_core::AppConfig::default();
    config.server.upstream = ProviderId::OpenAi;
    config.server.bind = "127.0.0.1:0".to_string();
    config.providers.openai =
        ProviderConfig::for_provider(ProviderId::OpenAi).with_api_key("sk-test-0123456789");

    let server = ProxyServer::from_config(&config).unwrap();
    assert_eq!(server.bind_addr().ip().to_string(), "127.0.0.1");
    assert_eq!(server.state.upstream.id(), ProviderId::OpenAi);
}
