//! Provider construction from configuration

use super::anthropic::AnthropicProvider;
use super::openai::OpenAiProvider;
use super::provider_trait::CompletionProvider;
use super::proxy::ProxyProvider;
use crate::config::{ProviderConfig, ProvidersConfig};
use crate::error::{ChatError, ChatResult};
use crate::llm::provider_types::ProviderId;
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Build the HTTP client shared by all providers
pub fn build_http_client(connect_timeout: Duration) -> ChatResult<Client> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .build()
        .map_err(|e| ChatError::config(format!("Failed to build HTTP client: {}", e)))
}

/// Construct the client for one network provider
pub fn build_provider(
    id: ProviderId,
    config: &ProviderConfig,
    http_client: Client,
) -> ChatResult<Arc<dyn CompletionProvider>> {
    let provider: Arc<dyn CompletionProvider> = match id {
        ProviderId::Claude => Arc::new(AnthropicProvider::new(config.clone(), http_client)?),
        ProviderId::DeepSeek | ProviderId::OpenAi => {
            Arc::new(OpenAiProvider::new(id, config.clone(), http_client)?)
        }
        ProviderId::Proxy => Arc::new(ProxyProvider::new(config, http_client)?),
        ProviderId::Local => {
            return Err(ChatError::config("the local responder is not a network provider"));
        }
    };
    Ok(provider)
}

/// The providers available to the router, keyed by id
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<ProviderId, Arc<dyn CompletionProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every provider with a usable credential. Unconfigured providers
    /// are left out; nothing here touches the network.
    pub fn from_config(config: &ProvidersConfig) -> ChatResult<Self> {
        let http_client = build_http_client(Duration::from_secs(config.connect_timeout_secs))?;
        let mut registry = Self::new();

        for id in config.configured() {
            if let Some(provider_config) = config.get(id) {
                registry = registry.with_provider(build_provider(id, provider_config, http_client.clone())?);
            }
        }

        tracing::debug!("Configured providers: {:?}", registry.ids());
        Ok(registry)
    }

    /// Register a provider under its own id, replacing any previous one
    pub fn with_provider(mut self, provider: Arc<dyn CompletionProvider>) -> Self {
        self.providers.insert(provider.id(), provider);
        self
    }

    pub fn get(&self, id: ProviderId) -> Option<Arc<dyn CompletionProvider>> {
        self.providers.get(&id).cloned()
    }

    pub fn contains(&self, id: ProviderId) -> bool {
        self.providers.contains_key(&id)
    }

    /// Registered ids in fallback priority order
    pub fn ids(&self) -> Vec<ProviderId> {
        ProviderId::NETWORK
            .into_iter()
            .filter(|id| self.contains(*id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.ids())
            .finish()
    }
}
