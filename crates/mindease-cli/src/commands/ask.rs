//! `mindease ask`: answer one message and exit

use super::build_router;
use crate::console::CliConsole;
use crate::render::StreamPrinter;
use crate::session::ChatSession;
use anyhow::{Result, anyhow};
use mindease_core::{AppConfig, PartialCallback, RoutingDecision};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

pub async fn run(console: &CliConsole, config: &AppConfig, message: &str, stream: bool) -> Result<()> {
    let mut session = ChatSession::new(build_router(config)?);
    let cancel = CancellationToken::new();
    let watcher = super::chat::cancel_on_ctrl_c(cancel.clone());

    let printer = Mutex::new(StreamPrinter::new());
    let on_partial: &PartialCallback<'_> = &|text: &str| printer.lock().update(text);
    let on_decision = |decision: &RoutingDecision| console.print_decision(decision);

    let result = session
        .send(message, stream.then_some(on_partial), Some(&on_decision), &cancel)
        .await;
    watcher.abort();

    match result {
        Ok(text) => {
            let mut printer = printer.lock();
            if stream && printer.has_output() {
                printer.finish();
            } else {
                println!("{}", text);
            }
            Ok(())
        }
        Err(e) => {
            printer.lock().finish();
            console.print_user_error(&e);
            Err(anyhow!("{}", e.message))
        }
    }
}
