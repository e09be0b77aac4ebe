//! CLI argument definitions using clap

use clap::{Parser, Subcommand};
use mindease_core::ConfigLoader;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mindease")]
#[command(about = "MindEase - a calm, supportive chat companion")]
#[command(
    long_about = r#"MindEase - a calm, supportive chat companion

USAGE:
  mindease chat                  # Start a conversation
  mindease ask "message"         # One message, one answer
  mindease analyze "message"     # Show which provider would answer
  mindease serve                 # Run the /api/chat proxy server
  mindease config show           # Show the effective configuration

Provider credentials come from ANTHROPIC_API_KEY (or CLAUDE_API_KEY),
DEEPSEEK_API_KEY, OPENAI_API_KEY and MINDEASE_PROXY_URL. Without any of
them MindEase answers with its built-in responses."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (JSON, TOML or YAML); defaults to
    /// ./mindease_config.json or the user config directory
    #[arg(long, global = true)]
    pub config_file: Option<String>,

    /// Provider selection: `heuristic` or `pinned:<provider>`
    #[arg(long, global = true)]
    pub selection: Option<String>,

    /// Seconds to wait for a provider before falling back
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Skip the typing effect of built-in responses
    #[arg(long, global = true)]
    pub instant: bool,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start an interactive conversation
    Chat,

    /// Send a single message and print the answer
    Ask {
        /// The message to send
        message: String,

        /// Print the answer only once it is complete
        #[arg(long)]
        no_stream: bool,
    },

    /// Show how a message would be routed, without sending it
    Analyze {
        /// The message to analyze
        message: String,
    },

    /// Run the proxy server exposing /api/chat and /api/health
    Serve {
        /// Address to listen on, e.g. 127.0.0.1:5001
        #[arg(long)]
        bind: Option<String>,

        /// Provider to forward to
        #[arg(long)]
        upstream: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the effective configuration with secrets masked
    Show,
}

impl Cli {
    /// `--config-file`, else the default lookup location
    pub fn config_path(&self) -> PathBuf {
        self.config_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(ConfigLoader::default_file_path)
    }

    /// Command-line overrides, keyed like the environment variables they replace
    pub fn overrides(&self) -> HashMap<String, String> {
        let mut args = HashMap::new();
        if let Some(selection) = &self.selection {
            args.insert("MINDEASE_SELECTION".to_string(), selection.clone());
        }
        if let Some(timeout) = self.timeout {
            args.insert("MINDEASE_PROVIDER_TIMEOUT_SECS".to_string(), timeout.to_string());
        }
        if self.instant {
            args.insert("MINDEASE_INSTANT_TYPING".to_string(), "true".to_string());
        }
        if let Commands::Serve { bind, upstream } = &self.command {
            if let Some(bind) = bind {
                args.insert("MINDEASE_BIND".to_string(), bind.clone());
            }
            if let Some(upstream) = upstream {
                args.insert("MINDEASE_UPSTREAM".to_string(), upstream.clone());
            }
        }
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask() {
        let cli = Cli::parse_from(["mindease", "ask", "hello there", "--no-stream", "--timeout", "5"]);
        match &cli.command {
            Commands::Ask { message, no_stream } => {
                assert_eq!(message, "hello there");
                assert!(*no_stream);
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert_eq!(
            cli.overrides().get("MINDEASE_PROVIDER_TIMEOUT_SECS").map(String::as_str),
            Some("5")
        );
    }

    #[test]
    fn test_serve_overrides() {
        let cli = Cli::parse_from([
            "mindease",
            "serve",
            "--bind",
            "127.0.0.1:8080",
            "--upstream",
            "openai",
        ]);
        let args = cli.overrides();
        assert_eq!(args.get("MINDEASE_BIND").map(String::as_str), Some("127.0.0.1:8080"));
        assert_eq!(args.get("MINDEASE_UPSTREAM").map(String::as_str), Some("openai"));
        assert_eq!(cli.config_path(), ConfigLoader::default_file_path());

        let cli = Cli::parse_from(["mindease", "--config-file", "custom.toml", "chat"]);
        assert_eq!(cli.config_path(), PathBuf::from("custom.toml"));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["mindease", "chat", "--selection", "pinned:local", "--instant"]);
        let args = cli.overrides();
        assert_eq!(args.get("MINDEASE_SELECTION").map(String::as_str), Some("pinned:local"));
        assert_eq!(args.get("MINDEASE_INSTANT_TYPING").map(String::as_str), Some("true"));
    }
}
