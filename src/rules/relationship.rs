//! Relationship rules (`relationship-rules.yaml`).

use serde::Deserialize;

use super::Messages;
use crate::document::Tier;

/// One `from` tier and the tiers it may point to.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierConstraint {
    pub from: Tier,
    #[serde(default)]
    pub to: Vec<Tier>,
}

/// A configured relationship type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RelationshipType {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub allowed_tiers: Vec<TierConstraint>,
}

/// Dependency cycle detection settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CycleDetectionRule {
    pub enabled: bool,
    /// The only relationship type whose edges form the dependency graph.
    pub relationship_type: String,
}

impl Default for CycleDetectionRule {
    fn default() -> Self {
        Self {
            enabled: true,
            relationship_type: "depends-on".to_string(),
        }
    }
}

/// Rules for relationships between documents.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RelationshipRules {
    pub version: Option<String>,
    pub relationship_types: Vec<RelationshipType>,
    pub circular_dependency_detection: CycleDetectionRule,
    pub error_messages: Messages,
}

impl Default for RelationshipRules {
    fn default() -> Self {
        Self {
            version: None,
            relationship_types: Vec::new(),
            circular_dependency_detection: CycleDetectionRule::default(),
            error_messages: Messages::from_pairs(&[
                (
                    "invalid_type",
                    "Invalid relationship type '{type}'. Allowed types: {allowed_types}",
                ),
                ("missing_type", "Relationship missing 'type' field in '{doc_id}'"),
                (
                    "missing_target",
                    "Relationship missing 'target' field in '{doc_id}'",
                ),
                (
                    "self_reference",
                    "Document '{doc_id}' cannot have a '{type}' relationship to itself",
                ),
                (
                    "target_not_found",
                    "Relationship target '{target}' not found (from '{source}', type '{type}')",
                ),
                (
                    "target_not_in_bundle",
                    "Relationship target '{target}' not found in this bundle. May exist in another bundle.",
                ),
                (
                    "tier_constraint_violation",
                    "Relationship '{type}' not allowed from {from_tier} to {to_tier}. Allowed: {allowed}",
                ),
                ("circular_dependency", "Circular dependency detected: {cycle}"),
            ]),
        }
    }
}

impl RelationshipRules {
    fn find(&self, name: &str) -> Option<&RelationshipType> {
        self.relationship_types.iter().find(|t| t.name == name)
    }

    pub fn is_valid_type(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Configured type names, in file order.
    pub fn type_names(&self) -> Vec<&str> {
        self.relationship_types
            .iter()
            .map(|t| t.name.as_str())
            .collect()
    }

    /// Whether `rel_type` may point from `from` to `to`. Unknown types allow
    /// nothing.
    pub fn is_valid_tier_combination(&self, rel_type: &str, from: Tier, to: Tier) -> bool {
        self.find(rel_type).is_some_and(|t| {
            t.allowed_tiers
                .iter()
                .any(|c| c.from == from && c.to.contains(&to))
        })
    }

    /// Allowed tier pairs for a type, rendered `from→to`.
    pub fn allowed_combinations(&self, rel_type: &str) -> Vec<String> {
        let Some(t) = self.find(rel_type) else {
            return Vec::new();
        };
        t.allowed_tiers
            .iter()
            .flat_map(|c| c.to.iter().map(move |to| format!("{}→{}", c.from, to)))
            .collect()
    }
}
