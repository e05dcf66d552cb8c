//! JSON report formatter.
//!
//! Produces a machine-readable report for CI tooling.

use std::io::Write;

use serde::Serialize;
use serde_json::{Map, Value};

use super::{ReportFormatter, ReportStatus, Summary, VALIDATOR_VERSION};
use crate::validate::{Finding, ValidationResult};

/// Formats a report as JSON.
pub struct JsonFormatter;

#[derive(Serialize)]
struct JsonReport<'a> {
    validator_version: &'static str,
    strict_mode: bool,
    validation_levels: Map<String, Value>,
    errors: Vec<JsonFinding<'a>>,
    warnings: Vec<JsonFinding<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonFinding<'a> {
    level: Option<&'static str>,
    message: &'a str,
    doc_id: Option<&'a str>,
    file_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    line: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    column: Option<usize>,
}

#[derive(Serialize)]
struct JsonSummary {
    total_errors: usize,
    total_warnings: usize,
    status: ReportStatus,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn finding(finding: &Finding) -> JsonFinding<'_> {
        JsonFinding {
            level: finding.level.map(|l| l.as_str()),
            message: &finding.message,
            doc_id: finding.doc_id.as_deref(),
            file_path: finding.file_path.as_ref().map(|p| p.display().to_string()),
            line: finding.span.map(|s| s.line),
            column: finding.span.and_then(|s| s.column),
        }
    }

    fn level_entry(result: &ValidationResult) -> Value {
        let mut entry = Map::new();
        entry.insert(
            "status".to_string(),
            Value::from(if result.passed() { "passed" } else { "failed" }),
        );
        entry.insert("error_count".to_string(), Value::from(result.error_count()));
        entry.insert(
            "warning_count".to_string(),
            Value::from(result.warning_count()),
        );
        for (key, value) in &result.details {
            entry.insert(key.clone(), value.clone());
        }
        Value::Object(entry)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format<W: Write>(
        &self,
        results: &[ValidationResult],
        strict: bool,
        writer: &mut W,
    ) -> std::io::Result<()> {
        let summary = Summary::of(results);

        let report = JsonReport {
            validator_version: VALIDATOR_VERSION,
            strict_mode: strict,
            validation_levels: results
                .iter()
                .map(|r| (r.level.as_str().to_string(), Self::level_entry(r)))
                .collect(),
            errors: results
                .iter()
                .flat_map(|r| r.errors())
                .map(Self::finding)
                .collect(),
            warnings: results
                .iter()
                .flat_map(|r| r.warnings())
                .map(Self::finding)
                .collect(),
            summary: JsonSummary {
                total_errors: summary.errors,
                total_warnings: summary.warnings,
                status: ReportStatus::from_results(results, strict),
            },
        };

        serde_json::to_writer_pretty(&mut *writer, &report).map_err(std::io::Error::other)?;
        writeln!(writer)
    }
}
