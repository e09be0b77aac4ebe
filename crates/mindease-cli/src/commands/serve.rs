//! `mindease serve`: run the proxy server

use crate::console::CliConsole;
use crate::server::ProxyServer;
use anyhow::Result;
use mindease_core::AppConfig;

pub async fn run(console: &CliConsole, config: &AppConfig) -> Result<()> {
    let server = ProxyServer::from_config(config)?;
    console.success(&format!(
        "MindEase proxy on http://{} forwarding to {}",
        server.bind_addr(),
        config.server.upstream.display_name()
    ));
    console.info("Endpoints: POST /api/chat, GET /api/health");
    server.start().await
}
