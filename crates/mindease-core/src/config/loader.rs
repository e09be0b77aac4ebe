//! Layered configuration loading
//!
//! Sources are applied in the order they were added. Files replace the
//! defaults wholesale (missing fields keep their defaults); environment
//! variables and command-line overrides patch individual fields.

use super::api_key::{credential_env_vars, env_prefix};
use super::model::AppConfig;
use crate::error::{ChatError, ChatResult};
use crate::fallback::PacingConfig;
use crate::llm::ProviderId;
use crate::router::SelectionMode;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "mindease_config.json";

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// JSON, TOML or YAML file, chosen by extension. A missing file is skipped.
    File(PathBuf),
    /// Process environment
    Environment,
    /// Overrides keyed like the environment variables
    CommandLine(HashMap<String, String>),
    /// Built-in defaults
    Default,
}

/// Configuration loader with support for multiple sources
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_defaults(self) -> Self {
        self.add_source(ConfigSource::Default)
    }

    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    pub fn with_args(self, args: HashMap<String, String>) -> Self {
        self.add_source(ConfigSource::CommandLine(args))
    }

    /// `./mindease_config.json`, else `<config dir>/mindease/config.json`
    pub fn default_file_path() -> PathBuf {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return local;
        }
        dirs::config_dir()
            .map(|dir| dir.join("mindease").join("config.json"))
            .unwrap_or(local)
    }

    /// Load configuration from all sources and validate the result
    pub fn load(self) -> ChatResult<AppConfig> {
        let mut config = AppConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::Default => {
                    tracing::debug!("Loading default config");
                    config = AppConfig::default();
                }
                ConfigSource::File(path) => {
                    if let Some(file_config) = load_from_file(path)? {
                        tracing::debug!("Loaded config file {}", path.display());
                        config = file_config;
                    } else {
                        tracing::debug!("Config file {} not found, skipping", path.display());
                    }
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying environment overrides");
                    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
                }
                ConfigSource::CommandLine(args) => {
                    tracing::debug!("Applying {} command line overrides", args.len());
                    apply_overrides(&mut config, |key| args.get(key).cloned())?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn load_from_file(path: &Path) -> ChatResult<Option<AppConfig>> {
    if !path.exists() {
        return Ok(None);
    }

    let context = || format!("Reading configuration from '{}'", path.display());
    let content = fs::read_to_string(path).map_err(|e| {
        ChatError::config_with_context(format!("Failed to read config file: {}", e), context())
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            ChatError::config_with_context(format!("Failed to parse TOML config: {}", e), context())
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            ChatError::config_with_context(format!("Failed to parse YAML config: {}", e), context())
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            ChatError::config_with_context(format!("Failed to parse JSON config: {}", e), context())
        })?,
    };

    Ok(Some(config))
}

/// Patch `config` from variables resolved by `lookup`.
///
/// Blank values are treated as unset.
pub fn apply_overrides<F>(config: &mut AppConfig, lookup: F) -> ChatResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| {
        lookup(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    for id in ProviderId::NETWORK {
        let Some(provider) = config.providers.get_mut(id) else {
            continue;
        };

        if let Some(value) = credential_env_vars(id).iter().find_map(|&key| get(key)) {
            if id == ProviderId::Proxy {
                provider.base_url = Some(value);
            } else {
                provider.api_key = Some(value);
            }
        }

        if let Some(prefix) = env_prefix(id) {
            if let Some(model) = get(format!("{}_MODEL", prefix).as_str()) {
                provider.model = model;
            }
            if let Some(base_url) = get(format!("{}_BASE_URL", prefix).as_str()) {
                provider.base_url = Some(base_url);
            }
        }
    }

    if let Some(selection) = get("MINDEASE_SELECTION") {
        config.routing.selection = selection
            .parse::<SelectionMode>()
            .map_err(|e| ChatError::config_with_context(e, "MINDEASE_SELECTION"))?;
    }

    if let Some(secs) = get("MINDEASE_PROVIDER_TIMEOUT_SECS") {
        config.routing.provider_timeout_secs = secs.parse().map_err(|_| {
            ChatError::config_with_context(
                format!("'{}' is not a whole number of seconds", secs),
                "MINDEASE_PROVIDER_TIMEOUT_SECS",
            )
        })?;
    }

    if let Some(bind) = get("MINDEASE_BIND") {
        config.server.bind = bind;
    }

    if let Some(upstream) = get("MINDEASE_UPSTREAM") {
        config.server.upstream = upstream
            .parse()
            .map_err(|e: String| ChatError::config_with_context(e, "MINDEASE_UPSTREAM"))?;
    }

    if let Some(instant) = get("MINDEASE_INSTANT_TYPING") {
        if matches!(instant.to_lowercase().as_str(), "1" | "true" | "yes" | "on") {
            let deadline = config.pacing.deadline;
            config.pacing = PacingConfig {
                deadline,
                ..PacingConfig::instant()
            };
        }
    }

    Ok(())
}
