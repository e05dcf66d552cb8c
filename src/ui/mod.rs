//! Terminal output for the command line.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for writing to the terminal
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use scs_validator::ui::{MockUI, OutputMode, UserInterface};
//!
//! let mut ui = MockUI::with_mode(OutputMode::Verbose);
//! ui.note("Loading 3 documents...");
//! ui.error("Schema directory not found: schema");
//! ui.hint("Use --schema-dir to specify the location");
//!
//! assert!(ui.has_note("3 documents"));
//! assert!(ui.has_error("not found"));
//! ```

pub mod mock;
pub mod output;
pub mod terminal;
pub mod theme;

pub use mock::MockUI;
pub use output::OutputMode;
pub use terminal::TerminalUI;
pub use theme::{should_use_colors, ScsTheme};

/// Trait for user interface interactions.
///
/// This trait allows mocking the UI in tests.
pub trait UserInterface {
    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Display a hint on how to fix the preceding error.
    fn hint(&mut self, msg: &str);

    /// Display a progress note, shown only in verbose mode.
    fn note(&mut self, msg: &str);
}
