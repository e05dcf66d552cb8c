//! Document rules (`doc-rules.yaml`).

use serde::Deserialize;

use super::Messages;

/// Default id pattern when the rules file does not set one.
pub const DEFAULT_ID_PATTERN: &str = r"^doc:(meta|project|standards):[a-zA-Z0-9._-]+$";

/// A rule that is just a regular expression.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct PatternRule {
    pub pattern: Option<String>,
    pub description: Option<String>,
}

/// Rules for individual documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentRules {
    /// Version of the rule set itself.
    pub version: Option<String>,
    /// Pattern every `version` must match before semver parsing.
    pub version_pattern: PatternRule,
    /// Pattern every `id` must match.
    pub id_pattern: PatternRule,
    /// Fields that must not be blank when present.
    pub required_text_fields: Vec<String>,
    pub error_messages: Messages,
}

impl Default for DocumentRules {
    fn default() -> Self {
        Self {
            version: None,
            version_pattern: PatternRule::default(),
            id_pattern: PatternRule {
                pattern: Some(DEFAULT_ID_PATTERN.to_string()),
                description: None,
            },
            required_text_fields: vec!["title".to_string(), "description".to_string()],
            error_messages: Messages::from_pairs(&[
                (
                    "invalid_version_format",
                    "Version '{version}' does not match required pattern: {pattern}",
                ),
                (
                    "invalid_id_format",
                    "ID '{doc_id}' does not match required pattern: {pattern}",
                ),
            ]),
        }
    }
}

impl DocumentRules {
    /// The id pattern, falling back to [`DEFAULT_ID_PATTERN`].
    pub fn id_pattern(&self) -> &str {
        self.id_pattern.pattern.as_deref().unwrap_or(DEFAULT_ID_PATTERN)
    }
}
