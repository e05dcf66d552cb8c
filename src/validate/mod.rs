//! Multi-level validation of documents and bundles.
//!
//! Each validator owns one level and returns a [`ValidationResult`]:
//!
//! - [`SchemaValidator`] - JSON Schema conformance (`schema`, `bundle_schema`)
//! - [`SemanticValidator`] - identity, version, provenance (`semantic`)
//! - [`BundleValidator`] - bundle composition (`bundle`)
//! - [`RelationshipValidator`] - typed edges and cycles (`relationships`)
//! - [`CompletenessValidator`] - the opt-in project audit (`completeness`)
//!
//! Findings accumulate; a failing check never stops the rest of its level.
//!
//! # Example
//!
//! ```
//! use scs_validator::validate::{Finding, Level, Severity, ValidationResult};
//!
//! let mut result = ValidationResult::new(Level::Bundle);
//! result.add(Severity::Warning, Finding::new("Unknown bundle type 'x'"));
//! assert!(result.passed());
//!
//! result.add(Severity::Error, Finding::new("Bundle missing 'type'"));
//! assert!(!result.passed());
//! ```

pub mod bundle;
pub mod completeness;
pub mod finding;
pub mod relationship;
pub mod result;
pub mod schema;
pub mod semantic;

pub use bundle::BundleValidator;
pub use completeness::CompletenessValidator;
pub use finding::{Finding, Severity, Span};
pub use relationship::RelationshipValidator;
pub use result::{Level, ValidationResult};
pub use schema::SchemaValidator;
pub use semantic::SemanticValidator;
