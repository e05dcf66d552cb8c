//! JSON Schema validation.
//!
//! Documents are checked against the schema of their tier,
//! `<root>/doc/<tier>-doc-template.json`; bundles against
//! `<root>/bundles/doc-bundle-schema.json`. Schemas are draft 2020-12 and
//! are compiled once per validator.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Draft, ValidationError, Validator};
use serde_json::Value;

use super::{Finding, Level, ValidationResult};
use crate::document::{load_schema, Bundle, DocId, Document, Tier};
use crate::error::{Result, ScsError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum SchemaKey {
    Tier(Tier),
    Bundle,
}

/// Validates documents and bundles against their JSON Schemas.
pub struct SchemaValidator {
    root: PathBuf,
    cache: HashMap<SchemaKey, Validator>,
}

impl SchemaValidator {
    /// Create a validator over a schema root, which must exist.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ScsError::SchemaDirNotFound { path: root });
        }
        Ok(Self {
            root,
            cache: HashMap::new(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the schema for a document tier.
    pub fn document_schema_path(&self, tier: Tier) -> PathBuf {
        self.root
            .join("doc")
            .join(format!("{}-doc-template.json", tier))
    }

    /// Path of the bundle schema.
    pub fn bundle_schema_path(&self) -> PathBuf {
        self.root.join("bundles").join("doc-bundle-schema.json")
    }

    fn compiled(&mut self, key: SchemaKey) -> Result<&Validator> {
        if !self.cache.contains_key(&key) {
            let path = match key {
                SchemaKey::Tier(tier) => self.document_schema_path(tier),
                SchemaKey::Bundle => self.bundle_schema_path(),
            };
            let schema = load_schema(&path)?;
            let validator = jsonschema::options()
                .with_draft(Draft::Draft202012)
                .build(&schema)
                .map_err(|e| ScsError::SchemaInvalid {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
            tracing::debug!("Compiled schema {}", path.display());
            self.cache.insert(key, validator);
        }
        self.cache.get(&key).ok_or_else(|| ScsError::SchemaNotFound {
            path: self.root.clone(),
        })
    }

    /// Validate a document against the schema of its tier.
    pub fn validate_document(&mut self, doc: &Document) -> ValidationResult {
        let mut result = ValidationResult::new(Level::Schema);
        let file = doc.file_path();

        let Some(id) = doc.id.as_deref() else {
            result.add_error(Finding::new("Missing required field 'id'").with_file(file));
            return result;
        };

        let Some(doc_id) = DocId::parse(id) else {
            result.add_error(
                Finding::new(format!(
                    "Invalid document ID format: '{}'. Expected format: doc:<tier>:<name>",
                    id
                ))
                .with_doc_id(id)
                .with_file(file),
            );
            return result;
        };

        let value = doc.to_value();
        match self.compiled(SchemaKey::Tier(doc_id.tier)) {
            Ok(validator) => {
                for error in validator.iter_errors(&value) {
                    result.add_error(
                        Finding::new(format_schema_error(&error))
                            .with_doc_id(id)
                            .with_file(file),
                    );
                }
            }
            Err(e) => {
                result.add_error(Finding::new(e.to_string()).with_doc_id(id).with_file(file));
            }
        }

        if result.passed() {
            result.set_detail("tier", doc_id.tier.as_str());
            result.set_detail("doc_id", id);
        }
        result
    }

    /// Validate a bundle against the bundle schema.
    pub fn validate_bundle(&mut self, bundle: &Bundle) -> ValidationResult {
        let mut result = ValidationResult::new(Level::BundleSchema);
        let file = bundle.file_path();

        let value = bundle.to_value();
        match self.compiled(SchemaKey::Bundle) {
            Ok(validator) => {
                for error in validator.iter_errors(&value) {
                    result.add_error(Finding::new(format_schema_error(&error)).with_file(file));
                }
            }
            Err(e) => result.add_error(Finding::new(e.to_string()).with_file(file)),
        }

        if result.passed() {
            result.set_detail("bundle_id", bundle.id_or_unknown());
        }
        result
    }
}

/// Dotted field path of an error, or `root`.
fn field_path(error: &ValidationError<'_>) -> String {
    let pointer = error.instance_path.to_string();
    let trimmed = pointer.trim_start_matches('/');
    if trimmed.is_empty() {
        "root".to_string()
    } else {
        trimmed.replace('/', ".")
    }
}

/// One readable line per schema error.
fn format_schema_error(error: &ValidationError<'_>) -> String {
    let field = field_path(error);
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = match property {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            format!("Missing required field: '{}'", name)
        }
        ValidationErrorKind::Pattern { .. } => {
            format!("Field '{}' does not match required pattern: {}", field, error)
        }
        ValidationErrorKind::Type { .. } => {
            format!("Field '{}' has incorrect type: {}", field, error)
        }
        ValidationErrorKind::Constant { .. } => format!("Field '{}' must be: {}", field, error),
        ValidationErrorKind::MinLength { .. } => {
            format!("Field '{}' is too short: {}", field, error)
        }
        _ => format!("Field '{}': {}", field, error),
    }
}
