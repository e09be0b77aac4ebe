//! Per-turn provider selection with timeout and offline fallback

use super::classifier::classify;
use super::types::{DecisionCallback, MessageCategory, RoutingDecision, SelectionMode};
use crate::config::{AppConfig, RoutingConfig};
use crate::error::{ChatError, ChatResult};
use crate::fallback::FallbackResponder;
use crate::llm::{
    ChatMessage, CompletionProvider, PartialCallback, ProviderId, ProviderRegistry,
    latest_user_message,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const NO_PROVIDER_REASON: &str = "No provider credentials configured";

enum Selection {
    Provider(Arc<dyn CompletionProvider>, RoutingDecision),
    Local(RoutingDecision),
}

impl Selection {
    fn decision(&self) -> &RoutingDecision {
        match self {
            Selection::Provider(_, decision) | Selection::Local(decision) => decision,
        }
    }
}

/// Chooses a provider for each turn and absorbs every recoverable failure
/// by answering from the [`FallbackResponder`] instead.
///
/// Holds no per-turn state. Callers must not run two turns for the same
/// transcript at once.
#[derive(Debug, Clone)]
pub struct SmartRouter {
    registry: ProviderRegistry,
    fallback: FallbackResponder,
    routing: RoutingConfig,
}

impl SmartRouter {
    pub fn new(registry: ProviderRegistry, fallback: FallbackResponder, routing: RoutingConfig) -> Self {
        Self {
            registry,
            fallback,
            routing,
        }
    }

    /// Build providers, fallback pacing and routing policy from configuration
    pub fn from_config(config: &AppConfig) -> ChatResult<Self> {
        let registry = ProviderRegistry::from_config(&config.providers)?;
        Ok(Self::new(
            registry,
            FallbackResponder::new(config.pacing.clone()),
            config.routing.clone(),
        ))
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn routing(&self) -> &RoutingConfig {
        &self.routing
    }

    /// The decision the router would make for `message`, without calling anything
    pub fn analyze(&self, message: &str) -> RoutingDecision {
        self.select(&[ChatMessage::user(message)]).decision().clone()
    }

    /// Answer a conversation.
    ///
    /// Resolves with provider or fallback text; provider failures and
    /// timeouts never surface here. `on_decision` fires exactly once, before
    /// the provider call, and is not repeated if the call then falls back.
    ///
    /// `on_partial` snapshots only grow, with one exception: when a provider
    /// fails after streaming some text, the fallback restarts the answer by
    /// emitting `""` and then its own growing prefixes. The resolved text
    /// always equals the last snapshot.
    pub async fn get_smart_completion(
        &self,
        messages: &[ChatMessage],
        on_partial: Option<&PartialCallback<'_>>,
        on_decision: Option<&DecisionCallback<'_>>,
    ) -> ChatResult<String> {
        let never = CancellationToken::new();
        self.get_smart_completion_with_cancel(messages, on_partial, on_decision, &never)
            .await
    }

    /// [`get_smart_completion`](Self::get_smart_completion) that stops with
    /// [`ChatError::Cancelled`] as soon as `cancel` fires. Cancellation does
    /// not trigger the fallback.
    pub async fn get_smart_completion_with_cancel(
        &self,
        messages: &[ChatMessage],
        on_partial: Option<&PartialCallback<'_>>,
        on_decision: Option<&DecisionCallback<'_>>,
        cancel: &CancellationToken,
    ) -> ChatResult<String> {
        let selection = self.select(messages);
        let decision = selection.decision();
        info!(
            "Routing decision: {} ({}%) - {}",
            decision.chosen_provider.display_name(),
            decision.confidence_percent(),
            decision.reason
        );
        if let Some(notify) = on_decision {
            notify(decision);
        }

        let provider = match selection {
            Selection::Local(_) => {
                return self.fallback.respond_with_cancel(messages, on_partial, cancel).await;
            }
            Selection::Provider(provider, _) => provider,
        };

        let id = provider.id();
        let timeout = self.routing.provider_timeout();
        let call = tokio::time::timeout(timeout, provider.complete(messages, on_partial));

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Turn cancelled while waiting for {}", id);
                return Err(ChatError::Cancelled);
            }
            outcome = call => outcome,
        };

        let error = match outcome {
            Ok(Ok(text)) => {
                debug!("{} answered with {} bytes", id, text.len());
                return Ok(text);
            }
            Ok(Err(e)) if !e.is_recoverable() => return Err(e),
            Ok(Err(e)) => e,
            Err(_) => ChatError::timeout(id, timeout),
        };

        warn!("{}; using built-in response", error);
        self.fallback.respond_with_cancel(messages, on_partial, cancel).await
    }

    fn select(&self, messages: &[ChatMessage]) -> Selection {
        let local = |reason: String| Selection::Local(RoutingDecision::new(ProviderId::Local, reason, 1.0));

        match self.routing.selection {
            SelectionMode::Pinned(ProviderId::Local) => {
                local("Offline responses selected by configuration".to_string())
            }
            _ if self.registry.is_empty() => local(NO_PROVIDER_REASON.to_string()),
            SelectionMode::Pinned(id) => match self.registry.get(id) {
                Some(provider) => Selection::Provider(
                    provider,
                    RoutingDecision::new(
                        id,
                        format!("Pinned to {} by configuration", id.display_name()),
                        1.0,
                    ),
                ),
                None => local(format!(
                    "Pinned provider {} is not configured",
                    id.display_name()
                )),
            },
            SelectionMode::Heuristic => self.select_heuristic(latest_user_message(messages)),
        }
    }

    fn select_heuristic(&self, message: &str) -> Selection {
        let classification = classify(message);
        debug!(
            "Classified as {} (complex {:.1}, practical {:.1})",
            classification.category, classification.complex_score, classification.practical_score
        );

        let preferred = match classification.category {
            MessageCategory::Complex => self.routing.complex_provider,
            MessageCategory::Practical => self.routing.practical_provider,
        };

        if let Some(provider) = self.registry.get(preferred) {
            let decision =
                RoutingDecision::new(preferred, classification.reason, classification.confidence);
            return Selection::Provider(provider, decision);
        }

        let substitute = self
            .registry
            .ids()
            .into_iter()
            .find_map(|id| self.registry.get(id).map(|p| (id, p)));

        match substitute {
            Some((id, provider)) => {
                let reason = format!(
                    "{}; {} is not configured, using {}",
                    classification.reason,
                    preferred.display_name(),
                    id.display_name()
                );
                Selection::Provider(
                    provider,
                    RoutingDecision::new(id, reason, classification.confidence),
                )
            }
            None => Selection::Local(RoutingDecision::new(ProviderId::Local, NO_PROVIDER_REASON, 1.0)),
        }
    }
}
