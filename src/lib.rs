//! SCS Validator - multi-level validation for SCS documents and bundles.
//!
//! Documents (`doc:<tier>:<name>`) and the bundles that group them are
//! checked level by level: syntax, JSON schema, semantics, bundle
//! composition, cross-document relationships and, opt-in, project
//! completeness. Each level produces a
//! [`ValidationResult`](validate::ValidationResult); the
//! [`report`] module turns the ordered results into a text or JSON report
//! and an exit status.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`document`] - File loading, documents, bundles, ids and versions
//! - [`error`] - Error types and result aliases
//! - [`pipeline`] - Runs the levels over files or a bundle
//! - [`report`] - Text and JSON reports
//! - [`rules`] - Rule sets and the rules loader
//! - [`ui`] - Terminal output
//! - [`validate`] - The validators and their results
//!
//! # Example
//!
//! ```
//! use scs_validator::document::{Document, Relationship};
//! use scs_validator::rules::RelationshipRules;
//! use scs_validator::validate::RelationshipValidator;
//!
//! let mut a = Document::default();
//! a.id = Some("doc:project:a".to_string());
//! a.relationships.push(Relationship::new("depends-on", "doc:project:b"));
//!
//! let mut b = Document::default();
//! b.id = Some("doc:project:b".to_string());
//! b.relationships.push(Relationship::new("depends-on", "doc:project:a"));
//!
//! let validator = RelationshipValidator::new(RelationshipRules::default());
//! let result = validator.validate(&[a, b], "project");
//!
//! assert!(result.passed());
//! assert!(result.warnings()[0].message.starts_with("Circular dependency detected"));
//! ```

pub mod cli;
pub mod document;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod ui;
pub mod validate;

pub use error::{Result, ScsError};
