//! Visual theme and styling.

use console::Style;

/// The validator's visual theme.
#[derive(Debug, Clone)]
pub struct ScsTheme {
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for progress notes (dim).
    pub dim: Style,
    /// Style for hints following an error (cyan).
    pub hint: Style,
}

impl Default for ScsTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl ScsTheme {
    /// Create the default theme.
    pub fn new() -> Self {
        Self {
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            hint: Style::new().cyan(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            error: Style::new(),
            dim: Style::new(),
            hint: Style::new(),
        }
    }

    /// Pick the themed or plain variant.
    pub fn for_colors(use_color: bool) -> Self {
        if use_color {
            Self::new()
        } else {
            Self::plain()
        }
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a hint (arrow + text in cyan).
    pub fn format_hint(&self, msg: &str) -> String {
        format!("{}", self.hint.apply_to(format!("→ {}", msg)))
    }

    pub fn format_note(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(msg))
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_hint() {
        let msg = ScsTheme::plain().format_hint("Use --schema-dir");
        assert_eq!(msg, "→ Use --schema-dir");
    }

    #[test]
    fn theme_formats_error() {
        let msg = ScsTheme::plain().format_error("Failed");
        assert_eq!(msg, "✗ Failed");
    }

    #[test]
    fn plain_note_is_unchanged() {
        assert_eq!(ScsTheme::plain().format_note("Loading"), "Loading");
    }

    #[test]
    fn colored_theme_keeps_text() {
        let theme = ScsTheme::for_colors(true);
        assert!(theme.format_error("Failed").contains("Failed"));
    }
}
