//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::pipeline::PipelineOptions;
use crate::report::OutputFormat;

/// SCS Validator - multi-level validation for SCS documents and bundles.
#[derive(Debug, Parser)]
#[command(name = "scs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Show progress notes while validating
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate documents or a bundle
    Validate(ValidateArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `validate` command.
#[derive(Debug, Clone, clap::Args)]
#[command(after_help = "Examples:\n  \
    scs validate context/meta/roles.yaml\n  \
    scs validate context/meta/*.yaml\n  \
    scs validate --bundle bundles/project-bundle.yaml --strict\n  \
    scs validate --bundle bundles/project-bundle.yaml --output json")]
pub struct ValidateArgs {
    /// Document files to validate
    pub files: Vec<PathBuf>,

    /// Validate a bundle and the documents it references
    #[arg(short, long, value_name = "PATH")]
    pub bundle: Option<PathBuf>,

    /// Fail on warnings (exit code 2)
    #[arg(long)]
    pub strict: bool,

    /// Directory containing the JSON schema files
    #[arg(short, long, value_name = "DIR", default_value = "schema", env = "SCS_SCHEMA_DIR")]
    pub schema_dir: PathBuf,

    /// Directory containing rule files (defaults to the bundled rules)
    #[arg(long, value_name = "DIR")]
    pub rules_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Skip completeness validation
    #[arg(long)]
    pub skip_completeness: bool,

    /// Path to a custom completeness rules file
    #[arg(long, value_name = "PATH")]
    pub completeness_rules: Option<PathBuf>,

    /// Treat unresolved relationship targets as errors in every bundle
    #[arg(long)]
    pub strict_references: bool,
}

impl Default for ValidateArgs {
    fn default() -> Self {
        Self {
            files: Vec::new(),
            bundle: None,
            strict: false,
            schema_dir: PathBuf::from("schema"),
            rules_dir: None,
            output: OutputFormat::Text,
            skip_completeness: false,
            completeness_rules: None,
            strict_references: false,
        }
    }
}

impl ValidateArgs {
    /// Pipeline options for these arguments.
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            schema_dir: self.schema_dir.clone(),
            rules_dir: self.rules_dir.clone(),
            completeness_rules: self.completeness_rules.clone(),
            skip_completeness: self.skip_completeness,
            strict_references: self.strict_references,
        }
    }
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
