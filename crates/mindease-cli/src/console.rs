//! CLI console utilities

use colored::*;
use mindease_core::RoutingDecision;
use mindease_core::error::UserFriendlyError;
use std::io::{self, Write};

/// CLI console for formatted output
pub struct CliConsole {
    verbose: bool,
}

impl CliConsole {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Print an info message (verbose only)
    pub fn info(&self, message: &str) {
        if self.verbose {
            println!("{} {}", "ℹ".blue().bold(), message);
        }
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(&self, message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red().bold(), message.red());
    }

    pub fn print_header(&self, title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.chars().count()).dimmed());
    }

    /// Print a `key: value` line
    pub fn print_field(&self, key: &str, value: &str) {
        println!("  {} {}", format!("{key}:").cyan(), value);
    }

    /// Print which responder is answering, on one dimmed line
    pub fn print_decision(&self, decision: &RoutingDecision) {
        let label = format!(
            "[{} · {}%]",
            decision.chosen_provider.display_name(),
            decision.confidence_percent()
        );
        if self.verbose {
            eprintln!("{} {}", label.magenta(), decision.reason.dimmed());
        } else {
            eprintln!("{}", label.magenta());
        }
    }

    /// Show a failed turn the way a chat window shows its toast
    pub fn print_user_error(&self, error: &UserFriendlyError) {
        eprintln!(
            "{} {} {}",
            "✗".red().bold(),
            format!("{}:", error.title).red().bold(),
            error.message.red()
        );
        if self.verbose {
            eprintln!("  {}", error.error_code.dimmed());
        }
    }

    /// Print the assistant label that precedes an answer
    pub fn print_assistant_prefix(&self) {
        print!("{} ", "MindEase ›".green().bold());
        let _ = io::stdout().flush();
    }

    /// Prompt for one line of input; `None` at end of input
    pub fn prompt(&self) -> io::Result<Option<String>> {
        print!("{} ", "You ›".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(input.trim_end_matches(['\r', '\n']).to_string()))
    }
}
