//! Provider identifiers

use serde::{Deserialize, Serialize};

/// Closed set of responders the router can report.
///
/// `Local` is the offline fallback responder; it is never a network call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Anthropic Claude
    Claude,
    /// DeepSeek (OpenAI-compatible API)
    DeepSeek,
    /// OpenAI
    OpenAi,
    /// A MindEase proxy server (`POST /api/chat`)
    Proxy,
    /// Built-in fallback responder
    Local,
}

impl ProviderId {
    /// Network providers in the order the router falls back through when the
    /// preferred one is not configured.
    pub const NETWORK: [ProviderId; 4] = [
        ProviderId::DeepSeek,
        ProviderId::Claude,
        ProviderId::OpenAi,
        ProviderId::Proxy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Claude => "claude",
            ProviderId::DeepSeek => "deepseek",
            ProviderId::OpenAi => "openai",
            ProviderId::Proxy => "proxy",
            ProviderId::Local => "local",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderId::Claude => "Claude",
            ProviderId::DeepSeek => "DeepSeek",
            ProviderId::OpenAi => "OpenAI",
            ProviderId::Proxy => "MindEase proxy",
            ProviderId::Local => "Built-in responder",
        }
    }

    pub fn is_network(&self) -> bool {
        !matches!(self, ProviderId::Local)
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProviderId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderId::Claude),
            "deepseek" => Ok(ProviderId::DeepSeek),
            "openai" => Ok(ProviderId::OpenAi),
            "proxy" => Ok(ProviderId::Proxy),
            "local" | "fallback" => Ok(ProviderId::Local),
            other => Err(format!("Unknown provider '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_aliases() {
        assert_eq!("Anthropic".parse::<ProviderId>(), Ok(ProviderId::Claude));
        assert_eq!(" deepseek ".parse::<ProviderId>(), Ok(ProviderId::DeepSeek));
        assert_eq!("fallback".parse::<ProviderId>(), Ok(ProviderId::Local));
        assert!("gemini".parse::<ProviderId>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        for id in ProviderId::NETWORK.iter().chain([ProviderId::Local].iter()) {
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_local_is_not_network() {
        assert!(!ProviderId::Local.is_network());
        assert!(ProviderId::NETWORK.iter().all(ProviderId::is_network));
    }
}
