//! Validation reports.
//!
//! This module turns the ordered per-level results of a run into a text or
//! JSON report and decides the final status of the run.

pub mod json;
pub mod text;

use std::io::Write;

use serde::Serialize;

use crate::validate::ValidationResult;

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Validator version shown in reports.
pub const VALIDATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Final status of a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    /// No errors, and no warnings in strict mode.
    Valid,
    /// Strict mode with warnings but no errors.
    ValidWithWarnings,
    /// At least one level failed.
    Failed,
}

impl ReportStatus {
    pub fn from_results(results: &[ValidationResult], strict: bool) -> Self {
        let summary = Summary::of(results);
        if !summary.all_passed {
            ReportStatus::Failed
        } else if strict && summary.warnings > 0 {
            ReportStatus::ValidWithWarnings
        } else {
            ReportStatus::Valid
        }
    }

    /// Process exit code for this status.
    pub fn exit_code(&self) -> i32 {
        match self {
            ReportStatus::Valid => 0,
            ReportStatus::Failed => 1,
            ReportStatus::ValidWithWarnings => 2,
        }
    }

    /// Status line text.
    pub fn label(&self) -> &'static str {
        match self {
            ReportStatus::Valid => "VALID",
            ReportStatus::ValidWithWarnings => "VALID WITH WARNINGS (strict mode)",
            ReportStatus::Failed => "FAILED",
        }
    }
}

/// Totals across all levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub errors: usize,
    pub warnings: usize,
    pub all_passed: bool,
}

impl Summary {
    pub fn of(results: &[ValidationResult]) -> Self {
        Self {
            errors: results.iter().map(|r| r.error_count()).sum(),
            warnings: results.iter().map(|r| r.warning_count()).sum(),
            all_passed: results.iter().all(|r| r.passed()),
        }
    }
}

/// Trait for formatting a validation report.
pub trait ReportFormatter {
    /// Write the report for `results` to `writer`.
    fn format<W: Write>(
        &self,
        results: &[ValidationResult],
        strict: bool,
        writer: &mut W,
    ) -> std::io::Result<()>;
}

/// Render a report to a string.
pub fn render<F: ReportFormatter>(
    formatter: &F,
    results: &[ValidationResult],
    strict: bool,
) -> String {
    let mut output = Vec::new();
    formatter.format(results, strict, &mut output).ok();
    String::from_utf8(output).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{Finding, Level};

    fn results(errors: usize, warnings: usize) -> Vec<ValidationResult> {
        let mut result = ValidationResult::new(Level::Semantic);
        for i in 0..errors {
            result.add_error(Finding::new(format!("error {}", i)));
        }
        for i in 0..warnings {
            result.add_warning(Finding::new(format!("warning {}", i)));
        }
        vec![ValidationResult::new(Level::Syntax), result]
    }

    #[test]
    fn status_and_exit_codes() {
        let cases = [
            (0, 0, false, ReportStatus::Valid, 0),
            (0, 2, false, ReportStatus::Valid, 0),
            (0, 0, true, ReportStatus::Valid, 0),
            (0, 2, true, ReportStatus::ValidWithWarnings, 2),
            (1, 0, false, ReportStatus::Failed, 1),
            (1, 3, true, ReportStatus::Failed, 1),
        ];
        for (errors, warnings, strict, status, code) in cases {
            let actual = ReportStatus::from_results(&results(errors, warnings), strict);
            assert_eq!(actual, status, "{} errors, {} warnings", errors, warnings);
            assert_eq!(actual.exit_code(), code);
        }
    }

    #[test]
    fn summary_totals() {
        let summary = Summary::of(&results(2, 3));
        assert_eq!(summary.errors, 2);
        assert_eq!(summary.warnings, 3);
        assert!(!summary.all_passed);
    }
}
