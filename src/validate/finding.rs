//! Validation findings.
//!
//! This module provides the [`Finding`] type for representing problems
//! discovered in documents and bundles, with optional document id, file and
//! source location for precise reporting.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::result::Level;

/// Severity configured for a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check is not reported at all.
    Skip,
    /// Informational, logged but not recorded.
    Info,
    /// Recorded as a warning, does not affect validity.
    Warning,
    /// Recorded as an error, fails the level.
    Error,
}

impl Severity {
    /// Parse a severity string from a rules file.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "skip" => Some(Severity::Skip),
            "info" => Some(Severity::Info),
            "warning" => Some(Severity::Warning),
            "error" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Skip => write!(f, "skip"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A 1-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: Option<usize>,
}

impl Span {
    /// Create a span covering a single line.
    pub fn line(line: usize) -> Self {
        Self { line, column: None }
    }

    /// Create a span with a precise position.
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column: Some(column),
        }
    }
}

/// A single error or warning produced by a validator.
#[derive(Debug, Clone, PartialEq)]
pub struct Finding {
    /// Level that recorded this finding; set when added to a result.
    pub level: Option<Level>,
    /// Human-readable message.
    pub message: String,
    /// Document the finding is about.
    pub doc_id: Option<String>,
    /// File the finding is about.
    pub file_path: Option<PathBuf>,
    /// Optional source location inside `file_path`.
    pub span: Option<Span>,
}

impl Finding {
    /// Create a new finding.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            level: None,
            message: message.into(),
            doc_id: None,
            file_path: None,
            span: None,
        }
    }

    /// Attach the document id.
    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = Some(doc_id.into());
        self
    }

    /// Attach the file path, if known.
    pub fn with_file(mut self, path: Option<&Path>) -> Self {
        self.file_path = path.map(Path::to_path_buf);
        self
    }

    /// Attach a source span.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }
}

impl fmt::Display for Finding {
    /// `path:line:col (doc-id) - message`, omitting absent parts.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(path) = &self.file_path {
            write!(f, "{}", path.display())?;
            if let Some(span) = &self.span {
                write!(f, ":{}", span.line)?;
                if let Some(col) = span.column {
                    write!(f, ":{}", col)?;
                }
            }
            write!(f, " ")?;
        }
        if let Some(doc_id) = &self.doc_id {
            write!(f, "({}) ", doc_id)?;
        }
        write!(f, "- {}", self.message)
    }
}
