//! Terminal rendering of streamed answers

use std::io::{self, Write};
use tracing::debug;

/// Prints cumulative snapshots as they grow.
///
/// Only the new suffix of each snapshot is written. A snapshot that does not
/// extend what is already on screen (the router restarting a turn with the
/// offline responder) starts a fresh line.
#[derive(Debug, Default)]
pub struct StreamPrinter {
    shown: String,
}

impl StreamPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, snapshot: &str) {
        if let Err(e) = self.write_to(&mut io::stdout().lock(), snapshot) {
            debug!("Failed to write answer to stdout: {}", e);
        }
    }

    /// Write the part of `snapshot` not yet shown to `out`
    fn write_to<W: Write>(&mut self, out: &mut W, snapshot: &str) -> io::Result<()> {
        let delta = self.delta(snapshot);
        out.write_all(delta.as_bytes())?;
        out.flush()
    }

    /// Text that must be written to move the screen to `snapshot`
    fn delta(&mut self, snapshot: &str) -> String {
        if let Some(suffix) = snapshot.strip_prefix(self.shown.as_str()) {
            let suffix = suffix.to_string();
            self.shown = snapshot.to_string();
            return suffix;
        }

        let restarted = !self.shown.is_empty();
        self.shown = snapshot.to_string();
        if restarted {
            format!("\n{snapshot}")
        } else {
            snapshot.to_string()
        }
    }

    /// Whether anything has been printed since creation
    pub fn has_output(&self) -> bool {
        !self.shown.is_empty()
    }

    /// End the answer with a newline if anything was printed
    pub fn finish(&mut self) {
        if self.has_output() {
            println!();
        }
        self.shown.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_suffix_is_written() {
        let mut printer = StreamPrinter::new();
        assert_eq!(printer.delta("Hel"), "Hel");
        assert_eq!(printer.delta("Hello "), "lo ");
        assert_eq!(printer.delta("Hello "), "");
        assert_eq!(printer.delta("Hello there"), "there");
    }

    #[test]
    fn test_reset_starts_new_line() {
        let mut printer = StreamPrinter::new();
        printer.delta("I hear");
        // empty reset from the fallback is a prefix of everything
        assert_eq!(printer.delta(""), "\n");
        assert_eq!(printer.delta("I"), "I");
        assert_eq!(printer.delta("It sounds"), "t sounds");
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_errors_are_reported() {
        let mut printer = StreamPrinter::new();
        let mut out = Vec::new();
        printer.write_to(&mut out, "Breathe").unwrap();
        printer.write_to(&mut out, "Breathe in").unwrap();
        assert_eq!(out, b"Breathe in");

        let err = printer.write_to(&mut ClosedPipe, "Breathe in slowly").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_divergent_snapshot_restarts() {
        let mut printer = StreamPrinter::new();
        printer.delta("Hello");
        assert_eq!(printer.delta("Goodbye"), "\nGoodbye");
    }
}
