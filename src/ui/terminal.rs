//! Terminal UI.

use console::Term;
use std::io::Write;

use super::{OutputMode, ScsTheme, UserInterface};

/// Terminal UI implementation.
///
/// Reports go to stdout. Errors, hints and progress notes go to stderr, so
/// `--output json` stays machine-readable.
pub struct TerminalUI {
    out: Term,
    err: Term,
    theme: ScsTheme,
    mode: OutputMode,
}

impl TerminalUI {
    /// Create a new terminal UI.
    pub fn new(mode: OutputMode, use_color: bool) -> Self {
        Self {
            out: Term::stdout(),
            err: Term::stderr(),
            theme: ScsTheme::for_colors(use_color),
            mode,
        }
    }
}

impl UserInterface for TerminalUI {
    fn message(&mut self, msg: &str) {
        writeln!(self.out, "{}", msg).ok();
    }

    fn error(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_error(msg)).ok();
    }

    fn hint(&mut self, msg: &str) {
        writeln!(self.err, "{}", self.theme.format_hint(msg)).ok();
    }

    fn note(&mut self, msg: &str) {
        if self.mode.shows_notes() {
            writeln!(self.err, "{}", self.theme.format_note(msg)).ok();
        }
    }
}
