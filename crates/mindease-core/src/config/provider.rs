//! Per-provider connection settings

use crate::llm::ProviderId;
use serde::{Deserialize, Serialize};

pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Connection settings for one provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// API key. Empty or whitespace-only counts as absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Only used by Anthropic
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: String::new(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            api_version: None,
        }
    }
}

impl ProviderConfig {
    /// Defaults for a given provider
    pub fn for_provider(id: ProviderId) -> Self {
        let (base_url, model, api_version) = match id {
            ProviderId::Claude => (
                Some("https://api.anthropic.com"),
                "claude-3-5-sonnet-20241022",
                Some(ANTHROPIC_API_VERSION),
            ),
            ProviderId::DeepSeek => (Some("https://api.deepseek.com"), "deepseek-chat", None),
            ProviderId::OpenAi => (Some("https://api.openai.com/v1"), "gpt-4o", None),
            ProviderId::Proxy | ProviderId::Local => (None, "", None),
        };

        Self {
            base_url: base_url.map(str::to_string),
            model: model.to_string(),
            api_version: api_version.map(str::to_string),
            ..Self::default()
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Trimmed API key, if usable
    pub fn get_api_key(&self) -> Option<&str> {
        non_blank(self.api_key.as_deref())
    }

    /// Base URL without a trailing slash
    pub fn get_base_url(&self) -> Option<&str> {
        non_blank(self.base_url.as_deref()).map(|url| url.trim_end_matches('/'))
    }

    pub fn get_api_version(&self) -> &str {
        non_blank(self.api_version.as_deref()).unwrap_or(ANTHROPIC_API_VERSION)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Settings for every provider the router may use
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub claude: ProviderConfig,
    pub deepseek: ProviderConfig,
    pub openai: ProviderConfig,
    /// A MindEase proxy; usable when `base_url` is set
    pub proxy: ProviderConfig,
    pub connect_timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            claude: ProviderConfig::for_provider(ProviderId::Claude),
            deepseek: ProviderConfig::for_provider(ProviderId::DeepSeek),
            openai: ProviderConfig::for_provider(ProviderId::OpenAi),
            proxy: ProviderConfig::for_provider(ProviderId::Proxy),
            connect_timeout_secs: 10,
        }
    }
}

impl ProvidersConfig {
    pub fn get(&self, id: ProviderId) -> Option<&ProviderConfig> {
        match id {
            ProviderId::Claude => Some(&self.claude),
            ProviderId::DeepSeek => Some(&self.deepseek),
            ProviderId::OpenAi => Some(&self.openai),
            ProviderId::Proxy => Some(&self.proxy),
            ProviderId::Local => None,
        }
    }

    pub fn get_mut(&mut self, id: ProviderId) -> Option<&mut ProviderConfig> {
        match id {
            ProviderId::Claude => Some(&mut self.claude),
            ProviderId::DeepSeek => Some(&mut self.deepseek),
            ProviderId::OpenAi => Some(&mut self.openai),
            ProviderId::Proxy => Some(&mut self.proxy),
            ProviderId::Local => None,
        }
    }

    /// Whether a provider can be called at all
    pub fn has_usable_credential(&self, id: ProviderId) -> bool {
        match self.get(id) {
            Some(cfg) if id == ProviderId::Proxy => cfg.get_base_url().is_some(),
            Some(cfg) => cfg.get_api_key().is_some(),
            None => false,
        }
    }

    /// Network providers with usable credentials, in fallback priority order
    pub fn configured(&self) -> Vec<ProviderId> {
        ProviderId::NETWORK
            .into_iter()
            .filter(|id| self.has_usable_credential(*id))
            .collect()
    }
}
