//! Bundle rules (`bundle-rules.yaml`).

use std::collections::HashMap;

use serde::Deserialize;

use super::Messages;

/// The imports-XOR-scds constraint.
///
/// Its severity is read with [`severity_at`](super::severity_at) under
/// `xor_constraint`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct XorRule {
    pub enabled: bool,
}

impl Default for XorRule {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Count constraints on a bundle list field.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ArrayConstraint {
    pub min: Option<usize>,
    pub max: Option<usize>,
    /// At least one item is required.
    pub required: bool,
}

impl ArrayConstraint {
    fn new(min: Option<usize>, max: Option<usize>, required: bool) -> Self {
        Self { min, max, required }
    }
}

/// Constraints for one bundle type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct BundleTypeRule {
    pub description: Option<String>,
    pub imports: Option<ArrayConstraint>,
    pub scds: Option<ArrayConstraint>,
}

/// Extra rules for `meta` bundles.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MetaBundleRule {
    /// Pattern the meta bundle `version` should match.
    pub version_pattern: Option<String>,
}

/// Rules for bundle composition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BundleRules {
    pub version: Option<String>,
    pub xor_constraint: XorRule,
    pub bundle_types: HashMap<String, BundleTypeRule>,
    pub meta_bundle_requirements: MetaBundleRule,
    pub error_messages: Messages,
}

impl Default for BundleRules {
    fn default() -> Self {
        let mut bundle_types = HashMap::new();
        bundle_types.insert(
            "project".to_string(),
            BundleTypeRule {
                description: None,
                imports: Some(ArrayConstraint::new(Some(1), None, true)),
                scds: Some(ArrayConstraint::new(None, Some(0), false)),
            },
        );
        for name in ["domain", "meta", "standards"] {
            bundle_types.insert(
                name.to_string(),
                BundleTypeRule {
                    description: None,
                    imports: Some(ArrayConstraint::new(None, Some(0), false)),
                    scds: Some(ArrayConstraint::new(Some(1), None, true)),
                },
            );
        }

        Self {
            version: None,
            xor_constraint: XorRule::default(),
            bundle_types,
            meta_bundle_requirements: MetaBundleRule {
                version_pattern: Some(r"^\d+\.\d+\.\d+$".to_string()),
            },
            error_messages: Messages::from_pairs(&[
                (
                    "xor_violation",
                    "Bundle '{bundle_id}' (type: {bundle_type}) must contain either imports or scds, not both or neither (imports: {imports_count}, scds: {scds_count})",
                ),
                (
                    "insufficient_items",
                    "Bundle type '{bundle_type}' requires at least {required} {field} (found {actual})",
                ),
                (
                    "excessive_items",
                    "Bundle type '{bundle_type}' allows at most {allowed} {field} (found {actual})",
                ),
                (
                    "required_field_empty",
                    "Bundle type '{bundle_type}' requires a non-empty '{field}' list",
                ),
                (
                    "invalid_meta_version",
                    "Meta bundle version '{version}' does not match expected pattern: {pattern}",
                ),
            ]),
        }
    }
}
