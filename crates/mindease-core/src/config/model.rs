//! Application configuration model

use super::provider::ProvidersConfig;
use crate::error::{ChatError, ChatResult};
use crate::fallback::PacingConfig;
use crate::llm::ProviderId;
use crate::router::SelectionMode;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

pub const MIN_PROVIDER_TIMEOUT_SECS: u64 = 1;
pub const MAX_PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Complete MindEase configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub providers: ProvidersConfig,
    pub routing: RoutingConfig,
    pub pacing: PacingConfig,
    pub server: ServerConfig,
}

/// How the router picks a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingConfig {
    pub selection: SelectionMode,
    /// Upper bound for a whole provider call, streaming included
    pub provider_timeout_secs: u64,
    /// Provider preferred for complex, emotionally nuanced messages
    pub complex_provider: ProviderId,
    /// Provider preferred for practical, solution-oriented messages
    pub practical_provider: ProviderId,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            selection: SelectionMode::Heuristic,
            provider_timeout_secs: 15,
            complex_provider: ProviderId::Claude,
            practical_provider: ProviderId::DeepSeek,
        }
    }
}

impl RoutingConfig {
    pub fn provider_timeout(&self) -> Duration {
        Duration::from_secs(self.provider_timeout_secs)
    }
}

/// Proxy server settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Provider the proxy forwards `/api/chat` to
    pub upstream: ProviderId,
    pub upstream_max_tokens: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:5001".to_string(),
            upstream: ProviderId::DeepSeek,
            upstream_max_tokens: 2000,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> ChatResult<()> {
        let timeout = self.routing.provider_timeout_secs;
        if !(MIN_PROVIDER_TIMEOUT_SECS..=MAX_PROVIDER_TIMEOUT_SECS).contains(&timeout) {
            return Err(ChatError::config_with_context(
                format!(
                    "provider timeout must be between {} and {} seconds, got {}",
                    MIN_PROVIDER_TIMEOUT_SECS, MAX_PROVIDER_TIMEOUT_SECS, timeout
                ),
                "routing.provider_timeout_secs",
            ));
        }

        for (field, id) in [
            ("routing.complex_provider", self.routing.complex_provider),
            ("routing.practical_provider", self.routing.practical_provider),
            ("server.upstream", self.server.upstream),
        ] {
            if !id.is_network() {
                return Err(ChatError::config_with_context(
                    format!("'{}' is not a network provider", id),
                    field,
                ));
            }
        }

        if self.server.upstream == ProviderId::Proxy {
            return Err(ChatError::config_with_context(
                "the proxy server cannot forward to another proxy",
                "server.upstream",
            ));
        }

        self.server.bind.parse::<SocketAddr>().map_err(|e| {
            ChatError::config_with_context(
                format!("invalid bind address '{}': {}", self.server.bind, e),
                "server.bind",
            )
        })?;

        if self.pacing.deadline.is_zero() {
            return Err(ChatError::config_with_context(
                "fallback deadline must be positive",
                "pacing.deadline",
            ));
        }

        Ok(())
    }
}
