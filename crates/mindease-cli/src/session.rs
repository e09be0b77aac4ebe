//! Chat session controller
//!
//! Owns the visible transcript of one conversation and drives one turn at a
//! time through the [`SmartRouter`]. The assistant's answer is written into
//! the transcript in place while it streams.

use mindease_core::error::UserFriendlyError;
use mindease_core::llm::providers::DEFAULT_SYSTEM_INSTRUCTION;
use mindease_core::{
    ChatError, ChatMessage, DecisionCallback, PartialCallback, RoutingDecision, SmartRouter,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// First message of every conversation
pub const GREETING: &str = "Hello, I'm MindEase. I'm here to provide a safe, confidential space for you to explore your thoughts and feelings. I'd like to understand what brings you here today.\n\nFeel free to share whatever is on your mind - whether it's something that's been troubling you, a feeling you're trying to make sense of, or simply something you'd like to talk about. There's no judgment here, only support and understanding.\n\n**What would you like to talk about today?**";

pub struct ChatSession {
    router: Arc<SmartRouter>,
    transcript: Arc<Mutex<Vec<ChatMessage>>>,
    last_decision: Option<RoutingDecision>,
}

impl ChatSession {
    /// Start a conversation seeded with the greeting
    pub fn new(router: Arc<SmartRouter>) -> Self {
        Self {
            router,
            transcript: Arc::new(Mutex::new(vec![ChatMessage::assistant(GREETING)])),
            last_decision: None,
        }
    }

    /// Snapshot of the visible conversation
    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.transcript.lock().clone()
    }

    /// Routing decision of the most recent turn
    pub fn last_decision(&self) -> Option<&RoutingDecision> {
        self.last_decision.as_ref()
    }

    /// Send one user message and wait for the complete answer.
    ///
    /// The user message and an empty assistant message are appended first;
    /// the assistant message then tracks every partial snapshot. A turn that
    /// fails outright leaves the user message but drops the assistant one.
    /// Taking `&mut self` keeps turns from overlapping.
    pub async fn send(
        &mut self,
        input: &str,
        on_partial: Option<&PartialCallback<'_>>,
        on_decision: Option<&DecisionCallback<'_>>,
        cancel: &CancellationToken,
    ) -> Result<String, UserFriendlyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ChatError::invalid_input("Message is empty").to_user_friendly());
        }

        let (request, slot) = {
            let mut transcript = self.transcript.lock();
            transcript.push(ChatMessage::user(input));

            let mut request = Vec::with_capacity(transcript.len() + 1);
            request.push(ChatMessage::system(DEFAULT_SYSTEM_INSTRUCTION));
            request.extend(transcript.iter().filter(|m| !m.is_system()).cloned());

            transcript.push(ChatMessage::assistant(""));
            (request, transcript.len() - 1)
        };

        let transcript = self.transcript.clone();
        let update = move |partial: &str| {
            if let Some(message) = transcript.lock().get_mut(slot) {
                message.content = partial.to_string();
            }
            if let Some(cb) = on_partial {
                cb(partial);
            }
        };

        let decided = Mutex::new(None);
        let record = |decision: &RoutingDecision| {
            *decided.lock() = Some(decision.clone());
            if let Some(cb) = on_decision {
                cb(decision);
            }
        };

        let result = self
            .router
            .get_smart_completion_with_cancel(&request, Some(&update), Some(&record), cancel)
            .await;
        self.last_decision = decided.into_inner();

        let mut transcript = self.transcript.lock();
        match result {
            Ok(text) => {
                if let Some(message) = transcript.get_mut(slot) {
                    message.content = text.clone();
                }
                debug!("Turn complete, transcript has {} messages", transcript.len());
                Ok(text)
            }
            Err(e) => {
                transcript.truncate(slot);
                if !matches!(e, ChatError::Cancelled) {
                    error!("Turn failed: {}", e);
                }
                Err(e.to_user_friendly())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::stream;
    use mindease_core::config::RoutingConfig;
    use mindease_core::fallback::TemplateKind;
    use mindease_core::llm::{CompletionStream, ProviderRegistry};
    use mindease_core::{
        ChatResult, ChatRole, CompletionEvent, CompletionProvider, FallbackResponder,
        PacingConfig, ProviderId, SelectionMode,
    };

    /// Answers with fixed chunks and records what it was sent
    struct EchoProvider {
        chunks: Vec<&'static str>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    #[async_trait]
    impl CompletionProvider for EchoProvider {
        fn id(&self) -> ProviderId {
            ProviderId::DeepSeek
        }

        fn model(&self) -> &str {
            "test-model"
        }

        async fn chat(&self, messages: &[ChatMessage]) -> ChatResult<String> {
            self.seen.lock().push(messages.to_vec());
            Ok(self.chunks.concat())
        }

        async fn chat_stream(&self, messages: &[ChatMessage]) -> ChatResult<CompletionStream> {
            self.seen.lock().push(messages.to_vec());
            let mut events: Vec<_> = self.chunks.iter().map(|c| CompletionEvent::chunk(*c)).collect();
            events.push(CompletionEvent::done());
            Ok(Box::pin(stream::iter(events)))
        }
    }

    fn offline_session() -> ChatSession {
        let router = SmartRouter::new(
            ProviderRegistry::new(),
            FallbackResponder::new(PacingConfig::instant()),
            RoutingConfig::default(),
        );
        ChatSession::new(Arc::new(router))
    }

    fn session_with(provider: Arc<EchoProvider>) -> ChatSession {
        let router = SmartRouter::new(
            ProviderRegistry::new().with_provider(provider),
            FallbackResponder::new(PacingConfig::instant()),
            RoutingConfig {
                selection: SelectionMode::Pinned(ProviderId::DeepSeek),
                ..RoutingConfig::default()
            },
        );
        ChatSession::new(Arc::new(router))
    }

    #[test]
    fn test_seeded_with_greeting() {
        let session = offline_session();
        assert_eq!(session.transcript(), vec![ChatMessage::assistant(GREETING)]);
        assert!(session.last_decision().is_none());
    }

    #[tokio::test]
    async fn test_empty_input_is_rejected() {
        let mut session = offline_session();
        let err = session
            .send("   \n", None, None, &CancellationToken::new())
            .await
            .unwrap_err();
        assert_eq!(err.error_code, "INVALID_INPUT");
        assert_eq!(session.transcript().len(), 1);
    }

    #[tokio::test]
    async fn test_offline_turn_appends_template() {
        let mut session = offline_session();
        let text = session
            .send("  I keep having panic attacks ", None, None, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(text, TemplateKind::Anxiety.text());
        let transcript = session.transcript();
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1], ChatMessage::user("I keep having panic attacks"));
        assert_eq!(transcript[2], ChatMessage::assistant(TemplateKind::Anxiety.text()));
        assert_eq!(
            session.last_decision().map(|d| d.chosen_provider),
            Some(ProviderId::Local)
        );
    }

    #[tokio::test]
    async fn test_request_carries_instruction_and_history() {
        let provider = Arc::new(EchoProvider {
            chunks: vec!["That ", "sounds ", "hard."],
            seen: Mutex::new(Vec::new()),
        });
        let mut session = session_with(provider.clone());

        let snapshots = Arc::new(Mutex::new(Vec::new()));
        let sink = snapshots.clone();
        let on_partial = move |text: &str| sink.lock().push(text.to_string());

        let text = session
            .send("I lost my job", Some(&on_partial), None, &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(text, "That sounds hard.");
        assert_eq!(
            *snapshots.lock(),
            vec!["That ", "That sounds ", "That sounds hard."]
        );

        let seen = provider.seen.lock();
        let request = &seen[0];
        assert_eq!(request[0], ChatMessage::system(DEFAULT_SYSTEM_INSTRUCTION));
        assert_eq!(request[1], ChatMessage::assistant(GREETING));
        assert_eq!(request[2], ChatMessage::user("I lost my job"));
        assert_eq!(request.len(), 3);
        assert!(request.iter().all(|m| !(m.role == ChatRole::Assistant && m.content.is_empty())));
    }

    #[tokio::test]
    async fn test_second_turn_includes_first_answer() {
        let provider = Arc::new(EchoProvider {
            chunks: vec!["I'm listening."],
            seen: Mutex::new(Vec::new()),
        });
        let mut session = session_with(provider.clone());
        let cancel = CancellationToken::new();

        session.send("hello", None, None, &cancel).await.unwrap();
        session.send("still here", None, None, &cancel).await.unwrap();

        let seen = provider.seen.lock();
        let second = &seen[1];
        assert_eq!(second.len(), 5);
        assert_eq!(second[3], ChatMessage::assistant("I'm listening."));
        assert_eq!(second[4], ChatMessage::user("still here"));
        assert_eq!(session.transcript().len(), 5);
    }

    #[tokio::test]
    async fn test_cancelled_turn_drops_assistant_message() {
        let mut session = offline_session();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let noop = |_: &str| {};
        let err = session
            .send("I feel sad", Some(&noop), None, &cancel)
            .await
            .unwrap_err();
        assert_eq!(err.error_code, "CANCELLED");

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript[1], ChatMessage::user("I feel sad"));
    }

    #[tokio::test]
    async fn test_decision_callback_fires_once() {
        let mut session = offline_session();
        let count = Arc::new(Mutex::new(0));
        let counter = count.clone();
        let on_decision = move |_: &RoutingDecision| *counter.lock() += 1;

        session
            .send("hi", None, Some(&on_decision), &CancellationToken::new())
            .await
            .unwrap();
        assert_eq!(*count.lock(), 1);
    }
}
