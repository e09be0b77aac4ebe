//! Environment variable names and key masking

use crate::llm::ProviderId;

/// Environment variables holding a provider's credential, first match wins
pub fn credential_env_vars(id: ProviderId) -> &'static [&'static str] {
    match id {
        ProviderId::Claude => &["ANTHROPIC_API_KEY", "CLAUDE_API_KEY"],
        ProviderId::DeepSeek => &["DEEPSEEK_API_KEY"],
        ProviderId::OpenAi => &["OPENAI_API_KEY"],
        ProviderId::Proxy => &["MINDEASE_PROXY_URL"],
        ProviderId::Local => &[],
    }
}

/// Prefix used for `<PREFIX>_MODEL` and `<PREFIX>_BASE_URL`
pub fn env_prefix(id: ProviderId) -> Option<&'static str> {
    match id {
        ProviderId::Claude => Some("ANTHROPIC"),
        ProviderId::DeepSeek => Some("DEEPSEEK"),
        ProviderId::OpenAi => Some("OPENAI"),
        ProviderId::Proxy => Some("MINDEASE_PROXY"),
        ProviderId::Local => None,
    }
}

/// Mask an API key for display
pub fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let prefix: String = chars[..6].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", prefix, suffix)
}
