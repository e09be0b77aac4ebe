//! `mindease chat`: interactive conversation

use super::build_router;
use crate::console::CliConsole;
use crate::render::StreamPrinter;
use crate::session::{ChatSession, GREETING};
use anyhow::Result;
use mindease_core::{AppConfig, RoutingDecision};
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

const EXIT_COMMANDS: [&str; 3] = ["exit", "quit", "/exit"];

pub async fn run(console: &CliConsole, config: &AppConfig) -> Result<()> {
    let router = build_router(config)?;
    if router.registry().is_empty() {
        console.warn("No provider credentials configured; answering with built-in responses");
    }
    let mut session = ChatSession::new(router);

    console.print_assistant_prefix();
    println!("{}", GREETING);
    println!();

    loop {
        let Some(input) = console.prompt()? else {
            break;
        };
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        let cancel = CancellationToken::new();
        let watcher = cancel_on_ctrl_c(cancel.clone());

        let printer = Mutex::new(StreamPrinter::new());
        let on_partial = |text: &str| printer.lock().update(text);
        let on_decision = |decision: &RoutingDecision| {
            if console.is_verbose() {
                console.print_decision(decision);
            }
            console.print_assistant_prefix();
        };

        let result = session
            .send(input, Some(&on_partial), Some(&on_decision), &cancel)
            .await;
        watcher.abort();
        printer.lock().finish();

        if let Err(e) = result {
            console.print_user_error(&e);
        }
        println!();
    }

    debug!("Chat ended with {} messages", session.transcript().len());
    console.success("Take care of yourself. Goodbye.");
    Ok(())
}

/// Cancel `token` on Ctrl-C until the returned task is aborted
pub(crate) fn cancel_on_ctrl_c(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::select! {
            _ = token.cancelled() => {}
            result = tokio::signal::ctrl_c() => {
                if result.is_ok() {
                    debug!("Ctrl-C received, cancelling turn");
                    token.cancel();
                }
            }
        }
    })
}
