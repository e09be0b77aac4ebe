//! Provider clients

mod anthropic;
mod anthropic_stream;
mod error_utils;
mod event_stream;
mod openai;
mod openai_stream;
mod prompts;
mod provider_trait;
mod proxy;
mod registry;

#[cfg(test)]
mod anthropic_tests;

pub use anthropic::AnthropicProvider;
pub use anthropic_stream::{anthropic_sse_stream, parse_anthropic_event};
pub use openai::OpenAiProvider;
pub use openai_stream::{openai_sse_stream, parse_openai_event};
pub use prompts::{DEFAULT_SYSTEM_INSTRUCTION, with_default_instruction};
pub use provider_trait::CompletionProvider;
pub use proxy::ProxyProvider;
pub use registry::{ProviderRegistry, build_http_client, build_provider};
