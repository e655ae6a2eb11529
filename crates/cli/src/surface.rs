//! Terminal rendering of search output.

use std::io::{self, Write};

use coursefind_client::{Surface, View};

/// Writes views to stdout and progress to stderr.
#[derive(Debug, Default)]
pub struct TerminalSurface;

impl Surface for TerminalSurface {
    fn clear(&self) {}

    fn show_loading(&self) {
        eprintln!("Searching...");
    }

    fn hide_loading(&self) {
        tracing::trace!("loading indicator hidden");
    }

    fn show(&self, view: &View) {
        let mut out = io::stdout().lock();
        if let Err(e) = write!(out, "{view}").and_then(|_| out.flush()) {
            tracing::warn!("failed to write results: {}", e);
        }
    }

    fn set_placeholder(&self, placeholder: &str) {
        tracing::debug!(placeholder, "search mode changed");
    }
}
