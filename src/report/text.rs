//! Human-readable report formatter.

use std::io::Write;

use console::Style;

use super::{ReportFormatter, ReportStatus, Summary, VALIDATOR_VERSION};
use crate::validate::ValidationResult;

/// Formats a report for terminal display.
pub struct TextFormatter {
    success: Style,
    warning: Style,
    error: Style,
    header: Style,
}

impl TextFormatter {
    /// Create a text formatter, with or without colours.
    pub fn new(use_color: bool) -> Self {
        if use_color {
            Self {
                success: Style::new().green(),
                warning: Style::new().yellow(),
                error: Style::new().red(),
                header: Style::new().bold(),
            }
        } else {
            Self {
                success: Style::new(),
                warning: Style::new(),
                error: Style::new(),
                header: Style::new(),
            }
        }
    }

    fn level_line(&self, result: &ValidationResult) -> String {
        let (mark, status) = if result.passed() {
            (self.success.apply_to("✓"), "passed")
        } else {
            (self.error.apply_to("✗"), "failed")
        };

        let mut line = format!("{} {} validation {}", mark, result.level.label(), status);

        let mut counts = Vec::new();
        if let Some(n) = result.details.get("files_checked") {
            counts.push(format!("{} files", n));
        }
        if let Some(n) = result.details.get("documents") {
            counts.push(format!("{} documents", n));
        }
        if !counts.is_empty() {
            line.push_str(&format!(" ({})", counts.join(", ")));
        }
        line
    }
}

impl ReportFormatter for TextFormatter {
    fn format<W: Write>(
        &self,
        results: &[ValidationResult],
        strict: bool,
        writer: &mut W,
    ) -> std::io::Result<()> {
        writeln!(
            writer,
            "{}",
            self.header
                .apply_to(format!("SCS Validator v{}", VALIDATOR_VERSION))
        )?;
        writeln!(writer)?;

        for result in results {
            writeln!(writer, "{}", self.level_line(result))?;
        }
        writeln!(writer)?;

        let summary = Summary::of(results);

        if summary.errors > 0 {
            writeln!(writer, "{}", self.error.apply_to("Errors:"))?;
            for finding in results.iter().flat_map(|r| r.errors()) {
                writeln!(writer, "  {} {}", self.error.apply_to("✗"), finding)?;
            }
            writeln!(writer)?;
        }

        if summary.warnings > 0 {
            writeln!(writer, "{}", self.warning.apply_to("Warnings:"))?;
            for finding in results.iter().flat_map(|r| r.warnings()) {
                writeln!(writer, "  {} {}", self.warning.apply_to("⚠"), finding)?;
            }
            writeln!(writer)?;
        }

        writeln!(writer, "Summary:")?;
        writeln!(writer, "  {} errors", summary.errors)?;
        writeln!(writer, "  {} warnings", summary.warnings)?;
        writeln!(writer)?;

        let status = ReportStatus::from_results(results, strict);
        let (style, mark) = match status {
            ReportStatus::Valid => (&self.success, "✓"),
            ReportStatus::ValidWithWarnings => (&self.warning, "⚠"),
            ReportStatus::Failed => (&self.error, "✗"),
        };
        writeln!(
            writer,
            "{}",
            style.apply_to(format!("Status: {} {}", mark, status.label()))
        )?;

        Ok(())
    }
}
