//! Smart routing between providers
//!
//! Each turn the latest user message is classified, a configured provider
//! is chosen and called under a timeout, and any failure is answered by the
//! offline fallback responder instead.

pub mod classifier;
mod smart_router;
mod types;

pub use classifier::classify;
pub use smart_router::{NO_PROVIDER_REASON, SmartRouter};
pub use types::{Classification, DecisionCallback, MessageCategory, RoutingDecision, SelectionMode};
