//! Validate command implementation.
//!
//! The `scs validate` command runs the validation pipeline over document
//! files or a bundle and prints the report.

use crate::cli::args::ValidateArgs;
use crate::error::{Result, ScsError};
use crate::pipeline::ValidationPipeline;
use crate::report::{render, JsonFormatter, OutputFormat, ReportStatus, TextFormatter};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The validate command implementation.
pub struct ValidateCommand {
    args: ValidateArgs,
    use_color: bool,
}

impl ValidateCommand {
    /// Create a new validate command.
    pub fn new(args: ValidateArgs, use_color: bool) -> Self {
        Self { args, use_color }
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ValidateArgs {
        &self.args
    }
}

impl Command for ValidateCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.bundle.is_none() && self.args.files.is_empty() {
            return Err(ScsError::NoInput);
        }

        let mut pipeline = ValidationPipeline::new(self.args.pipeline_options())?;
        let report = match &self.args.bundle {
            Some(bundle) => pipeline.validate_bundle(bundle)?,
            None => pipeline.validate_files(&self.args.files)?,
        };

        for note in &report.notes {
            ui.note(note);
        }

        let strict = self.args.strict;
        let output = match self.args.output {
            OutputFormat::Text => render(&TextFormatter::new(self.use_color), &report.results, strict),
            OutputFormat::Json => render(&JsonFormatter::new(), &report.results, strict),
        };
        ui.message(output.trim_end());

        let status = ReportStatus::from_results(&report.results, strict);
        tracing::debug!("Validation finished with status {:?}", status);

        Ok(match status {
            ReportStatus::Valid => CommandResult::success(),
            other => CommandResult::failure(other.exit_code()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::OutputFormat;
    use crate::ui::{MockUI, OutputMode};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const DOC_SCHEMA: &str = r#"{
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "type": "object",
        "required": ["id", "type", "version", "title", "description"]
    }"#;

    const VALID_DOC: &str = r#"id: doc:meta:roles
type: meta
version: 1.0.0
title: Roles
description: Who does what on the project
provenance:
  created_by: platform-team
  created_at: "2024-01-15T10:00:00Z"
  rationale: Shared vocabulary for roles
"#;

    fn setup() -> TempDir {
        let temp = TempDir::new().unwrap();
        let schema = temp.path().join("schema/doc");
        fs::create_dir_all(&schema).unwrap();
        for tier in ["meta", "project", "standards"] {
            fs::write(schema.join(format!("{}-doc-template.json", tier)), DOC_SCHEMA).unwrap();
        }
        temp
    }

    fn args(root: &Path, files: Vec<PathBuf>) -> ValidateArgs {
        ValidateArgs {
            files,
            schema_dir: root.join("schema"),
            ..Default::default()
        }
    }

    #[test]
    fn no_input_is_an_error() {
        let cmd = ValidateCommand::new(ValidateArgs::default(), false);
        let mut ui = MockUI::new();
        let err = cmd.execute(&mut ui).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn missing_schema_dir_is_an_error() {
        let temp = TempDir::new().unwrap();
        let cmd = ValidateCommand::new(args(temp.path(), vec![temp.path().join("a.yaml")]), false);
        let mut ui = MockUI::new();
        let err = cmd.execute(&mut ui).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn valid_file_succeeds() {
        let temp = setup();
        let doc = temp.path().join("roles.yaml");
        fs::write(&doc, VALID_DOC).unwrap();

        let cmd = ValidateCommand::new(args(temp.path(), vec![doc]), false);
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message("✓ Syntax validation passed (1 files)"));
        assert!(ui.has_message("Status: ✓ VALID"));
    }

    #[test]
    fn invalid_file_fails() {
        let temp = setup();
        let doc = temp.path().join("roles.yaml");
        fs::write(&doc, VALID_DOC.replace("type: meta", "type: project")).unwrap();

        let cmd = ValidateCommand::new(args(temp.path(), vec![doc]), false);
        let mut ui = MockUI::new();
        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_message("Type 'project' does not match tier 'meta'"));
    }

    #[test]
    fn json_output_is_parseable() {
        let temp = setup();
        let doc = temp.path().join("roles.yaml");
        fs::write(&doc, VALID_DOC).unwrap();

        let mut validate = args(temp.path(), vec![doc]);
        validate.output = OutputFormat::Json;
        let mut ui = MockUI::new();
        ValidateCommand::new(validate, false).execute(&mut ui).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&ui.output()).unwrap();
        assert_eq!(parsed["summary"]["status"], "valid");
        assert_eq!(parsed["validation_levels"]["semantic"]["files_checked"], 1);
    }

    #[test]
    fn verbose_mode_shows_notes() {
        let temp = setup();
        let doc = temp.path().join("roles.yaml");
        fs::write(&doc, VALID_DOC).unwrap();

        let cmd = ValidateCommand::new(args(temp.path(), vec![doc]), false);
        let mut ui = MockUI::with_mode(OutputMode::Verbose);
        cmd.execute(&mut ui).unwrap();

        assert!(ui.has_note("Validating"));
    }
}
