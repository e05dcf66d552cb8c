//! Error types for validator operations.
//!
//! This module defines [`ScsError`], the fatal error type used throughout
//! the crate, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Validation findings (errors and warnings about documents) are never
//!   `ScsError`s; they accumulate in a [`ValidationResult`](crate::validate::ValidationResult)
//! - `ScsError` is reserved for configuration and environment problems that
//!   stop the run (missing rules, missing schema directory, missing input)
//! - [`ScsError::Syntax`] is the one exception: the pipeline turns it into a
//!   syntax-level finding for the offending file

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for validator operations.
#[derive(Debug, Error)]
pub enum ScsError {
    /// Neither a bundle nor any document files were given.
    #[error("No files or bundle specified")]
    NoInput,

    /// Schema root directory does not exist.
    #[error("Schema directory not found: {path}")]
    SchemaDirNotFound { path: PathBuf },

    /// A schema file could not be found below the schema root.
    #[error("Schema file not found: {path}")]
    SchemaNotFound { path: PathBuf },

    /// A schema file exists but is not a usable JSON Schema.
    #[error("Invalid schema at {path}: {message}")]
    SchemaInvalid { path: PathBuf, message: String },

    /// Rules directory does not exist.
    #[error("Rules directory not found: {path}")]
    RulesDirNotFound { path: PathBuf },

    /// A rules file could not be found.
    #[error("Rules file not found: {path}")]
    RulesNotFound { path: PathBuf },

    /// A rules file could not be parsed into its rule set.
    #[error("Failed to load rules from {path}: {message}")]
    RulesParseError { path: PathBuf, message: String },

    /// A regular expression taken from a rules file does not compile.
    #[error("Invalid pattern '{pattern}' in rules: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// A document or bundle file could not be read or parsed.
    #[error("{}", format_syntax(.path, .line, .column, .message))]
    Syntax {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

fn format_syntax(
    path: &std::path::Path,
    line: &Option<usize>,
    column: &Option<usize>,
    message: &str,
) -> String {
    match (line, column) {
        (Some(line), Some(column)) => format!(
            "{}: {} at line {}, column {}",
            path.display(),
            message,
            line,
            column
        ),
        (Some(line), None) => format!("{}: {} at line {}", path.display(), message, line),
        _ => format!("{}: {}", path.display(), message),
    }
}

impl ScsError {
    /// Build a syntax error without location information.
    pub fn syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Syntax {
            path: path.into(),
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Process exit code for a run that stopped on this error.
    ///
    /// Codes 0-2 are produced from validation results, never from errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            ScsError::NoInput => 3,
            ScsError::SchemaDirNotFound { .. } => 4,
            _ => 5,
        }
    }

    /// A follow-up suggestion shown after the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            ScsError::NoInput => Some("Run 'scs validate --help' for usage"),
            ScsError::SchemaDirNotFound { .. } => {
                Some("Use --schema-dir to specify the location")
            }
            _ => None,
        }
    }
}

/// Result type alias for validator operations.
pub type Result<T> = std::result::Result<T, ScsError>;
