//! Validation rule sets.
//!
//! Four rule files drive the validators:
//!
//! - [`DocumentRules`] - id and version patterns for documents
//! - [`BundleRules`] - XOR constraint, per-type counts, meta bundle version
//! - [`RelationshipRules`] - relationship types and allowed tier pairs
//! - [`CompletenessRules`] - the opt-in project audit
//!
//! Rule files are YAML. Every key has a default, so a rule file only needs
//! to name what it changes. Each rule file may carry an `error_messages` map
//! of `{placeholder}` templates, rendered through [`Messages::render`].
//!
//! # Example
//!
//! ```
//! use scs_validator::rules::{RuleKind, RulesLoader};
//!
//! let mut loader = RulesLoader::bundled();
//! let rules = loader.relationship_rules().unwrap();
//! assert!(rules.is_valid_type("depends-on"));
//! assert_eq!(RuleKind::Relationship.file_name(), "relationship-rules.yaml");
//! ```

pub mod bundle;
pub mod completeness;
pub mod document;
pub mod loader;
pub mod relationship;

pub use bundle::{ArrayConstraint, BundleRules, BundleTypeRule, MetaBundleRule, XorRule};
pub use completeness::{
    BundleRequirement, ComplianceCheck, ComplianceRule, ComplianceValidation, CompletenessRules,
    DomainRequirement, RecommendedDoc, StubDetection, StubIndicator,
};
pub use document::{DocumentRules, PatternRule};
pub use loader::{RulesLoader, RulesSource};
pub use relationship::{CycleDetectionRule, RelationshipRules, RelationshipType, TierConstraint};

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use crate::validate::Severity;

/// The four kinds of rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Document,
    Bundle,
    Relationship,
    Completeness,
}

impl RuleKind {
    /// File name of this rule set inside a rules directory.
    pub fn file_name(&self) -> &'static str {
        match self {
            RuleKind::Document => "doc-rules.yaml",
            RuleKind::Bundle => "bundle-rules.yaml",
            RuleKind::Relationship => "relationship-rules.yaml",
            RuleKind::Completeness => "completeness-rules.yaml",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// The `error_messages` map of a rule file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct Messages(HashMap<String, String>);

impl Messages {
    /// Build a message map from `(key, template)` pairs.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Get the raw template for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Render the template for `key` with `{name}` placeholders filled from
    /// `vars`. `{{` and `}}` produce literal braces.
    ///
    /// Falls back to `key` itself when there is no template for it, or when
    /// the template names a placeholder missing from `vars`.
    pub fn render(&self, key: &str, vars: &[(&str, String)]) -> String {
        match self.get(key) {
            Some(template) => fill_template(template, vars).unwrap_or_else(|| key.to_string()),
            None => key.to_string(),
        }
    }

    /// Like [`Messages::render`], but uses `legacy` when there is a template
    /// for it and none for `key`.
    pub fn render_or_legacy(&self, key: &str, legacy: &str, vars: &[(&str, String)]) -> String {
        if self.get(key).is_none() && self.get(legacy).is_some() {
            return self.render(legacy, vars);
        }
        self.render(key, vars)
    }
}

/// Substitute `{name}` placeholders; `None` when one is unresolved or
/// the template is malformed.
pub fn fill_template(template: &str, vars: &[(&str, String)]) -> Option<String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(ch) => name.push(ch),
                        None => return None,
                    }
                }
                let (_, value) = vars.iter().find(|(k, _)| *k == name)?;
                out.push_str(value);
            }
            '}' => return None,
            _ => out.push(c),
        }
    }

    Some(out)
}

/// Resolve the severity configured at a dotted key path.
///
/// Walks nested mappings (`"xor_constraint"`,
/// `"compliance_validation.standards"`) and reads the `severity` entry of the
/// mapping found there. Returns `default` when the path does not lead to a
/// mapping or the mapping has no recognised `severity`.
pub fn severity_at(rules: &serde_yaml::Value, dotted_key: &str, default: Severity) -> Severity {
    let mut current = rules;
    for key in dotted_key.split('.') {
        match current.get(key) {
            Some(next) => current = next,
            None => return default,
        }
    }

    if !current.is_mapping() {
        return default;
    }

    current
        .get("severity")
        .and_then(|s| s.as_str())
        .and_then(Severity::parse)
        .unwrap_or(default)
}
