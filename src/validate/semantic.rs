//! Semantic checks on individual documents.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;

use super::{Finding, Level, ValidationResult};
use crate::document::{tier_of, Document, Provenance, SemVer, DRAFT};
use crate::error::{Result, ScsError};
use crate::rules::{DocumentRules, Messages};

/// Checks identity, version, provenance and text fields of documents.
pub struct SemanticValidator {
    version_pattern: Option<Regex>,
    id_pattern: Regex,
    required_text_fields: Vec<String>,
    messages: Messages,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| ScsError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}

impl SemanticValidator {
    /// Build a validator from document rules, compiling their patterns.
    pub fn new(rules: DocumentRules) -> Result<Self> {
        let version_pattern = rules
            .version_pattern
            .pattern
            .as_deref()
            .map(compile)
            .transpose()?;
        let id_pattern = compile(rules.id_pattern())?;

        Ok(Self {
            version_pattern,
            id_pattern,
            required_text_fields: rules.required_text_fields,
            messages: rules.error_messages,
        })
    }

    pub fn validate(&self, doc: &Document) -> ValidationResult {
        let mut result = ValidationResult::new(Level::Semantic);
        let id = doc.id_or_unknown();
        let finding = |message: String| {
            Finding::new(message)
                .with_doc_id(id)
                .with_file(doc.file_path())
        };

        check_field_types(doc, &mut result, &finding);
        self.check_type(doc, id, &mut result, &finding);
        if let Some(version) = doc.version.as_deref() {
            self.check_version(version, &mut result, &finding);
        }
        match &doc.provenance {
            Some(provenance) if !provenance.is_empty() => {
                check_provenance(provenance, &mut result, &finding)
            }
            _ => result.add_warning(finding("Provenance section is empty".to_string())),
        }
        self.check_id(id, &mut result, &finding);
        self.check_text_fields(doc, &mut result, &finding);

        result
    }

    fn check_type(
        &self,
        doc: &Document,
        id: &str,
        result: &mut ValidationResult,
        finding: &impl Fn(String) -> Finding,
    ) {
        // Malformed ids are reported by the id pattern check.
        let Some(tier) = tier_of(id) else {
            return;
        };
        match doc.doc_type.as_deref() {
            // A non-string type was already reported by the field type check.
            None if doc.extra.contains_key("type") => {}
            None => result.add_error(finding("Missing 'type' field".to_string())),
            Some(doc_type) if doc_type != tier.as_str() => result.add_error(finding(format!(
                "Type '{}' does not match tier '{}' in ID '{}'",
                doc_type, tier, id
            ))),
            Some(_) => {}
        }
    }

    fn check_version(
        &self,
        version: &str,
        result: &mut ValidationResult,
        finding: &impl Fn(String) -> Finding,
    ) {
        if let Some(pattern) = &self.version_pattern {
            if !pattern.is_match(version) {
                result.add_error(finding(self.messages.render(
                    "invalid_version_format",
                    &[
                        ("version", version.to_string()),
                        ("pattern", pattern.as_str().to_string()),
                    ],
                )));
                return;
            }
        }

        if version == DRAFT {
            return;
        }
        if let Err(e) = SemVer::parse(version) {
            result.add_error(finding(format!(
                "Version '{}' is not valid semantic versioning: {}",
                version, e
            )));
        }
    }

    fn check_id(&self, id: &str, result: &mut ValidationResult, finding: &impl Fn(String) -> Finding) {
        if !self.id_pattern.is_match(id) {
            result.add_error(finding(self.messages.render(
                "invalid_id_format",
                &[
                    ("doc_id", id.to_string()),
                    ("pattern", self.id_pattern.as_str().to_string()),
                ],
            )));
        }
    }

    fn check_text_fields(
        &self,
        doc: &Document,
        result: &mut ValidationResult,
        finding: &impl Fn(String) -> Finding,
    ) {
        for field in &self.required_text_fields {
            let value = match field.as_str() {
                "title" => doc.title.as_deref(),
                "description" => doc.description.as_deref(),
                "domain" => doc.domain.as_deref(),
                other => doc.extra.get(other).and_then(|v| v.as_str()),
            };
            if value.is_some_and(|v| v.trim().is_empty()) {
                result.add_error(finding(format!("Field '{}' must not be empty", field)));
            }
        }
    }
}

/// Fields that must be strings when present.
const STRING_FIELDS: [(&str, &str); 4] = [
    ("type", "Type"),
    ("version", "Version"),
    ("title", "Title"),
    ("description", "Description"),
];

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Report known fields whose value is not a string. They are left out of the
/// typed document, so no other check sees them.
fn check_field_types(
    doc: &Document,
    result: &mut ValidationResult,
    finding: &impl Fn(String) -> Finding,
) {
    for (field, label) in STRING_FIELDS {
        if let Some(value) = doc.extra.get(field).filter(|v| !v.is_string()) {
            result.add_error(finding(format!(
                "{} must be a string, got {}",
                label,
                json_type(value)
            )));
        }
    }
}

fn check_provenance(
    provenance: &Provenance,
    result: &mut ValidationResult,
    finding: &impl Fn(String) -> Finding,
) {
    if provenance
        .created_by
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        result.add_error(finding(
            "Provenance 'created_by' is required and must not be empty".to_string(),
        ));
    }

    for (name, value) in [
        ("created_at", &provenance.created_at),
        ("updated_at", &provenance.updated_at),
    ] {
        if let Some(timestamp) = value.as_deref().filter(|s| !s.is_empty()) {
            if let Err(e) = parse_timestamp(timestamp) {
                result.add_error(finding(format!(
                    "Provenance '{}' is not valid ISO8601 format: {}",
                    name, e
                )));
            }
        }
    }

    if provenance
        .rationale
        .as_deref()
        .is_none_or(|s| s.trim().is_empty())
    {
        result.add_warning(finding(
            "Provenance 'rationale' is recommended but missing".to_string(),
        ));
    }
}

/// Accept ISO-8601 dates and date-times, with or without an offset.
fn parse_timestamp(value: &str) -> std::result::Result<(), chrono::ParseError> {
    if DateTime::parse_from_rfc3339(value).is_ok() {
        return Ok(());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if NaiveDateTime::parse_from_str(value, format).is_ok() {
            return Ok(());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map(|_| ())
}
