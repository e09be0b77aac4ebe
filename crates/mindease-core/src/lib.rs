//! MindEase Core Library
//!
//! This crate provides the response routing and streaming-completion layer of
//! the MindEase assistant: provider clients for hosted models, the smart
//! router that picks one per turn, and the offline fallback responder used
//! when no provider is reachable.

// Allow common clippy lints that are stylistic preferences
#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod error;
pub mod fallback;
pub mod llm;
pub mod router;

// Re-export commonly used types
pub use config::{AppConfig, ConfigLoader, ProviderConfig};
pub use error::{ChatError, ChatResult};
pub use fallback::{FallbackResponder, PacingConfig, TemplateKind};
pub use llm::{ChatMessage, ChatRole, CompletionEvent, CompletionProvider, PartialCallback, ProviderId};
pub use router::{DecisionCallback, RoutingDecision, SelectionMode, SmartRouter};
