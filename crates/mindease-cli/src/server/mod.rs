//! Proxy HTTP server
//!
//! Relays `POST /api/chat` conversations to one upstream provider and writes
//! its answer back as a raw, progressively written text body.

mod error;
mod routes;

#[cfg(test)]
mod tests;

pub use routes::{AppState, create_router};

use anyhow::{Context, Result, bail};
use mindease_core::AppConfig;
use mindease_core::llm::providers::{build_http_client, build_provider};
use std::net::SocketAddr;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

/// Proxy server instance
pub struct ProxyServer {
    bind_addr: SocketAddr,
    state: AppState,
}

impl ProxyServer {
    /// Build the upstream client. Fails when the upstream has no credential.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let upstream = config.server.upstream;
        if !config.providers.has_usable_credential(upstream) {
            bail!(
                "No credential for upstream provider {}; set {} or choose another with --upstream",
                upstream.display_name(),
                mindease_core::config::api_key::credential_env_vars(upstream).join(" or ")
            );
        }

        let provider_config = config
            .providers
            .get(upstream)
            .cloned()
            .with_context(|| format!("{} cannot be used as the upstream", upstream))?
            .with_max_tokens(config.server.upstream_max_tokens);
        let client = build_http_client(Duration::from_secs(config.providers.connect_timeout_secs))?;
        let provider = build_provider(upstream, &provider_config, client)?;

        let bind_addr: SocketAddr = config
            .server
            .bind
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", config.server.bind))?;

        Ok(Self {
            bind_addr,
            state: AppState { upstream: provider },
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<()> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http());

        let listener = tokio::net::TcpListener::bind(self.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.bind_addr))?;
        info!(
            "Proxy listening on {} (upstream {}, model {})",
            self.bind_addr,
            self.state.upstream.id(),
            self.state.upstream.model()
        );

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Shutting down proxy");
            })
            .await?;
        Ok(())
    }
}
