//! Per-level validation results.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::finding::{Finding, Severity};

/// A validation level, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Syntax,
    Schema,
    BundleSchema,
    Semantic,
    Bundle,
    Relationships,
    Completeness,
}

impl Level {
    /// Machine name used in JSON reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Syntax => "syntax",
            Level::Schema => "schema",
            Level::BundleSchema => "bundle_schema",
            Level::Semantic => "semantic",
            Level::Bundle => "bundle",
            Level::Relationships => "relationships",
            Level::Completeness => "completeness",
        }
    }

    /// Capitalised name used in text reports.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Syntax => "Syntax",
            Level::Schema => "Schema",
            Level::BundleSchema => "Bundle schema",
            Level::Semantic => "Semantic",
            Level::Bundle => "Bundle",
            Level::Relationships => "Relationships",
            Level::Completeness => "Completeness",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one validation level.
///
/// Errors always fail the level; warnings never do. Findings keep the order
/// in which they were discovered.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub level: Level,
    passed: bool,
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    /// Level-specific details (counts, ids) surfaced in reports.
    pub details: Map<String, Value>,
}

impl ValidationResult {
    /// Create an empty, passing result.
    pub fn new(level: Level) -> Self {
        Self {
            level,
            passed: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            details: Map::new(),
        }
    }

    /// Record an error; the level no longer passes.
    pub fn add_error(&mut self, mut finding: Finding) {
        finding.level = Some(self.level);
        self.errors.push(finding);
        self.passed = false;
    }

    /// Record a warning.
    pub fn add_warning(&mut self, mut finding: Finding) {
        finding.level = Some(self.level);
        self.warnings.push(finding);
    }

    /// Record a finding at a configured severity.
    ///
    /// `Info` findings are logged only and `Skip` findings are dropped.
    pub fn add(&mut self, severity: Severity, finding: Finding) {
        match severity {
            Severity::Error => self.add_error(finding),
            Severity::Warning => self.add_warning(finding),
            Severity::Info => tracing::info!("[{}] {}", self.level, finding),
            Severity::Skip => {}
        }
    }

    /// Fold another result's findings into this one, keeping order.
    pub fn absorb(&mut self, other: ValidationResult) {
        for finding in other.errors {
            self.add_error(finding);
        }
        for finding in other.warnings {
            self.add_warning(finding);
        }
    }

    /// Set a detail value.
    pub fn set_detail(&mut self, key: &str, value: impl Into<Value>) {
        self.details.insert(key.to_string(), value.into());
    }

    pub fn passed(&self) -> bool {
        self.passed
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Whether the level recorded nothing at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}
