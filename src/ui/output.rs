//! Output verbosity.

/// Output verbosity mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Show progress notes as well as the report.
    Verbose,
    /// Show the report, errors and hints.
    #[default]
    Normal,
}

impl OutputMode {
    /// Pick the mode from the `--verbose` flag.
    pub fn from_flags(verbose: bool) -> Self {
        if verbose {
            Self::Verbose
        } else {
            Self::Normal
        }
    }

    /// Check if this mode shows progress notes.
    pub fn shows_notes(&self) -> bool {
        matches!(self, Self::Verbose)
    }
}
