//! Anthropic client against a mock server

use super::{AnthropicProvider, CompletionProvider, DEFAULT_SYSTEM_INSTRUCTION};
use crate::config::ProviderConfig;
use crate::llm::{ChatMessage, ProviderId};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::{Value, json};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_provider(base_url: &str) -> AnthropicProvider {
    let config = ProviderConfig::for_provider(ProviderId::Claude)
        .with_api_key("test-anthropic-key")
        .with_base_url(base_url);
    let http_client = Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to create HTTP client");
    AnthropicProvider::new(config, http_client).unwrap()
}

fn sse_event(kind: &str, data: Value) -> String {
    format!("event: {}\ndata: {}\n\n", kind, data)
}

fn stream_body(deltas: &[&str]) -> String {
    let mut body = sse_event(
        "message_start",
        json!({"type": "message_start", "message": {"id": "msg_1", "content": []}}),
    );
    body.push_str(&sse_event(
        "content_block_start",
        json!({"type": "content_block_start", "index": 0, "content_block": {"type": "text", "text": ""}}),
    ));
    body.push_str(&sse_event("ping", json!({"type": "ping"})));
    for delta in deltas {
        body.push_str(&sse_event(
            "content_block_delta",
            json!({"type": "content_block_delta", "index": 0, "delta": {"type": "text_delta", "text": delta}}),
        ));
    }
    body.push_str(&sse_event("content_block_stop", json!({"type": "content_block_stop", "index": 0})));
    body.push_str(&sse_event("message_stop", json!({"type": "message_stop"})));
    body
}

#[tokio::test]
async fn test_buffered_completion_and_request_shape() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test-anthropic-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "role": "assistant",
            "content": [
                {"type": "text", "text": "Grief moves "},
                {"type": "text", "text": "in waves."}
            ],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server.uri());
    let messages = vec![
        ChatMessage::system("First rule."),
        ChatMessage::assistant("Hello, I'm MindEase."),
        ChatMessage::user("I lost my father"),
        ChatMessage::system("Second rule."),
    ];
    let text = provider.complete(&messages, None).await.unwrap();
    assert_eq!(text, "Grief moves in waves.");

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["system"], "First rule.\n\nSecond rule.");
    assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
    assert_eq!(
        body["messages"],
        json!([{"role": "user", "content": "I lost my father"}])
    );
}

#[tokio::test]
async fn test_default_instruction_when_no_system() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{"type": "text", "text": "ok"}]
        })))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server.uri());
    provider.complete(&[ChatMessage::user("hi")], None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["system"], DEFAULT_SYSTEM_INSTRUCTION);
}

#[tokio::test]
async fn test_streaming_partials() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(stream_body(&["You ", "are ", "not alone."]), "text/event-stream"),
        )
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server.uri());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let cb = move |text: &str| sink.lock().push(text.to_string());

    let text = provider
        .complete(&[ChatMessage::user("hi")], Some(&cb))
        .await
        .unwrap();

    assert_eq!(text, "You are not alone.");
    assert_eq!(*seen.lock(), vec!["You ", "You are ", "You are not alone."]);
}

#[tokio::test]
async fn test_stream_error_event_fails() {
    let mock_server = MockServer::start().await;
    let mut body = stream_body(&["Partial"]);
    body = body.replace(
        "event: message_stop",
        "event: error\ndata: {\"type\":\"error\",\"error\":{\"message\":\"Overloaded\"}}\n\nevent: message_stop",
    );
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server.uri());
    let cb = |_: &str| {};
    let err = provider
        .complete(&[ChatMessage::user("hi")], Some(&cb))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Overloaded"));
}

#[tokio::test]
async fn test_http_error() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server.uri());
    let err = provider.chat(&[ChatMessage::user("hi")]).await.unwrap_err();
    assert_eq!(err.status_code(), Some(529));
    assert!(err.is_recoverable());
}
