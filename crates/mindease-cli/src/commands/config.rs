//! `mindease config show`

use crate::console::CliConsole;
use anyhow::Result;
use mindease_core::config::mask_api_key;
use mindease_core::{AppConfig, ProviderId};

pub fn show(console: &CliConsole, config: &AppConfig) -> Result<()> {
    console.print_header("Providers");
    for id in ProviderId::NETWORK {
        let Some(provider) = config.providers.get(id) else {
            continue;
        };
        let status = if config.providers.has_usable_credential(id) {
            "configured"
        } else {
            "not configured"
        };
        println!("  {} ({})", id.display_name(), status);
        if let Some(key) = provider.get_api_key() {
            console.print_field("  api key", &mask_api_key(key));
        }
        if let Some(base_url) = provider.get_base_url() {
            console.print_field("  base url", base_url);
        }
        if id != ProviderId::Proxy {
            console.print_field("  model", &provider.model);
        }
    }

    console.print_header("Routing");
    console.print_field("selection", &config.routing.selection.to_string());
    console.print_field(
        "provider timeout",
        &format!("{}s", config.routing.provider_timeout_secs),
    );
    console.print_field("complex", config.routing.complex_provider.as_str());
    console.print_field("practical", config.routing.practical_provider.as_str());

    console.print_header("Built-in responses");
    console.print_field(
        "typing",
        if config.pacing.base_delay.is_zero() {
            "instant"
        } else {
            "paced"
        },
    );
    console.print_field("deadline", &format!("{:?}", config.pacing.deadline));

    console.print_header("Server");
    console.print_field("bind", &config.server.bind);
    console.print_field("upstream", config.server.upstream.as_str());
    Ok(())
}
