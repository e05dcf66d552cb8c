//! Completeness rules (`completeness-rules.yaml`).
//!
//! The completeness audit is opt-in: a rule set with `enabled: false` (the
//! default) produces no findings at all.

use serde::Deserialize;
use serde_json::Value;

use super::Messages;
use crate::document::{Bundle, Document, ImportKind};
use crate::validate::Severity;

/// A required number of imported bundles of one kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BundleRequirement {
    #[serde(rename = "type")]
    pub kind: ImportKind,
    /// Exact count. Takes precedence over `min`.
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub min: Option<usize>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BundleRequirement {
    /// Whether `actual` imports satisfy this requirement.
    pub fn is_satisfied(&self, actual: usize) -> bool {
        match (self.count, self.min) {
            (Some(count), _) => actual == count,
            (None, Some(min)) => actual >= min,
            (None, None) => true,
        }
    }
}

/// A keyword pattern a domain should have a document for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecommendedDoc {
    /// `|`-separated keywords matched against document ids.
    pub pattern: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl RecommendedDoc {
    /// Case-insensitive substring match of any keyword against `doc_id`.
    pub fn matches(&self, doc_id: &str) -> bool {
        let id = doc_id.to_lowercase();
        self.pattern
            .split('|')
            .filter(|k| !k.is_empty())
            .any(|k| id.contains(&k.to_lowercase()))
    }
}

fn default_minimum_docs() -> usize {
    1
}

/// A domain the project must import and populate.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainRequirement {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_minimum_docs", alias = "minimum_scds")]
    pub minimum_docs: usize,
    #[serde(default, alias = "recommended_scds")]
    pub recommended_docs: Vec<RecommendedDoc>,
}

impl DomainRequirement {
    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

fn default_description_threshold() -> usize {
    50
}

fn default_content_threshold() -> usize {
    2
}

/// A signal that a document is a placeholder.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum StubIndicator {
    /// Trimmed description shorter than `threshold` characters.
    ShortDescription {
        #[serde(default = "default_description_threshold")]
        threshold: usize,
        #[serde(default)]
        message: Option<String>,
    },
    /// `content` absent, or an object with fewer than `threshold` fields.
    MinimalContent {
        #[serde(default = "default_content_threshold")]
        threshold: usize,
        #[serde(default)]
        message: Option<String>,
    },
    /// Title contains one of `patterns`, ignoring case.
    GenericTitle {
        #[serde(default)]
        patterns: Vec<String>,
        #[serde(default)]
        message: Option<String>,
    },
    /// No relationships at all.
    NoRelationships {
        #[serde(default)]
        message: Option<String>,
    },
}

impl StubIndicator {
    /// Message listed in the stub warning when this indicator triggers.
    pub fn message(&self) -> &str {
        match self {
            StubIndicator::ShortDescription { message, .. } => {
                message.as_deref().unwrap_or("Description is very short")
            }
            StubIndicator::MinimalContent { message, .. } => {
                message.as_deref().unwrap_or("Content has very few fields")
            }
            StubIndicator::GenericTitle { message, .. } => {
                message.as_deref().unwrap_or("Title is generic")
            }
            StubIndicator::NoRelationships { message } => {
                message.as_deref().unwrap_or("No relationships defined")
            }
        }
    }

    pub fn is_triggered(&self, doc: &Document) -> bool {
        match self {
            StubIndicator::ShortDescription { threshold, .. } => {
                let description = doc.description.as_deref().unwrap_or("");
                description.trim().chars().count() < *threshold
            }
            StubIndicator::MinimalContent { threshold, .. } => match &doc.content {
                None => 0 < *threshold,
                Some(Value::Object(fields)) => fields.len() < *threshold,
                Some(_) => false,
            },
            StubIndicator::GenericTitle { patterns, .. } => {
                let title = doc.title.as_deref().unwrap_or("").to_lowercase();
                patterns.iter().any(|p| title.contains(&p.to_lowercase()))
            }
            StubIndicator::NoRelationships { .. } => doc.relationships.is_empty(),
        }
    }
}

fn default_stub_message() -> String {
    "{doc_id} appears to be a stub: {indicators}".to_string()
}

/// Stub detection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct StubDetection {
    pub enabled: bool,
    /// Number of triggered indicators that makes a stub.
    pub stub_threshold: usize,
    pub warning_message: String,
    pub indicators: Vec<StubIndicator>,
}

impl Default for StubDetection {
    fn default() -> Self {
        Self {
            enabled: true,
            stub_threshold: 2,
            warning_message: default_stub_message(),
            indicators: Vec::new(),
        }
    }
}

/// A named project-level compliance check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceCheck {
    /// At least one import references the `standards` bundle.
    StandardsBundlePresent,
    /// At least one import references the `meta` bundle.
    MetaBundlePresent,
}

impl ComplianceCheck {
    pub fn is_satisfied(&self, bundle: &Bundle) -> bool {
        let wanted = match self {
            ComplianceCheck::StandardsBundlePresent => ImportKind::Standards,
            ComplianceCheck::MetaBundlePresent => ImportKind::Meta,
        };
        bundle.import_refs().any(|r| r.kind() == wanted)
    }

    /// Key of the failure message in `error_messages`.
    pub fn message_key(&self) -> &'static str {
        match self {
            ComplianceCheck::StandardsBundlePresent => "no_standards_bundle",
            ComplianceCheck::MetaBundlePresent => "no_meta_bundle",
        }
    }
}

fn default_error() -> Severity {
    Severity::Error
}

/// A compliance check with its own severity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComplianceRule {
    pub check: ComplianceCheck,
    #[serde(default = "default_error")]
    pub severity: Severity,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ComplianceValidation {
    pub enabled: bool,
    pub checks: Vec<ComplianceRule>,
}

impl Default for ComplianceValidation {
    fn default() -> Self {
        Self {
            enabled: true,
            checks: Vec::new(),
        }
    }
}

/// The project completeness audit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CompletenessRules {
    pub version: Option<String>,
    pub enabled: bool,
    /// Severity of bundle and domain requirement failures.
    pub severity: Severity,
    pub required_bundles: Vec<BundleRequirement>,
    pub required_domains: Vec<DomainRequirement>,
    pub stub_detection: StubDetection,
    pub compliance_validation: ComplianceValidation,
    pub error_messages: Messages,
}

impl Default for CompletenessRules {
    fn default() -> Self {
        Self {
            version: None,
            enabled: false,
            severity: Severity::Warning,
            required_bundles: Vec::new(),
            required_domains: Vec::new(),
            stub_detection: StubDetection::default(),
            compliance_validation: ComplianceValidation::default(),
            error_messages: Messages::from_pairs(&[
                ("missing_domain", "Required domain '{domain}' is not imported"),
                (
                    "insufficient_docs_in_domain",
                    "Domain '{domain}' has {actual} documents, at least {required} required",
                ),
                (
                    "missing_recommended_doc",
                    "Domain '{domain}' has no document matching '{pattern}' ({name})",
                ),
                (
                    "no_standards_bundle",
                    "Project does not import the standards bundle",
                ),
                ("no_meta_bundle", "Project does not import the meta bundle"),
            ]),
        }
    }
}
