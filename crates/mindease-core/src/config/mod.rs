//! Configuration for providers, routing, fallback pacing and the proxy server

pub mod api_key;
pub mod loader;
pub mod model;
pub mod provider;

pub use api_key::mask_api_key;
pub use loader::{ConfigLoader, ConfigSource, DEFAULT_CONFIG_FILE};
pub use model::{AppConfig, RoutingConfig, ServerConfig};
pub use provider::{ProviderConfig, ProvidersConfig};
