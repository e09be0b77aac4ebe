//! Chat messages, provider clients and the streaming event model

pub mod messages;
pub mod provider_types;
pub mod providers;
pub mod sse_decoder;
pub mod streaming;

pub use messages::{ChatMessage, ChatRole, latest_user_message};
pub use provider_types::ProviderId;
pub use providers::{
    AnthropicProvider, CompletionProvider, OpenAiProvider, ProviderRegistry, ProxyProvider,
};
pub use sse_decoder::{SseDecoder, SseEvent};
pub use streaming::{CompletionEvent, CompletionStream, PartialCallback, StreamAccumulator};
