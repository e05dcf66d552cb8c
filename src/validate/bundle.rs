//! Bundle composition checks.

use regex::Regex;

use super::{Finding, Level, Severity, ValidationResult};
use crate::document::Bundle;
use crate::error::{Result, ScsError};
use crate::rules::{ArrayConstraint, BundleRules, RuleKind, RulesLoader};

/// Enforces the imports/scds XOR, per-type counts and meta bundle rules.
pub struct BundleValidator {
    rules: BundleRules,
    xor_severity: Severity,
    meta_version: Option<Regex>,
}

impl BundleValidator {
    pub fn new(rules: BundleRules, xor_severity: Severity) -> Result<Self> {
        let meta_version = rules
            .meta_bundle_requirements
            .version_pattern
            .as_deref()
            .map(|p| {
                Regex::new(p).map_err(|e| ScsError::InvalidPattern {
                    pattern: p.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()?;

        Ok(Self {
            rules,
            xor_severity,
            meta_version,
        })
    }

    /// Build from the loader's bundle rules.
    pub fn from_loader(loader: &mut RulesLoader) -> Result<Self> {
        let rules = loader.bundle_rules()?;
        let xor_severity =
            loader.severity(RuleKind::Bundle, "xor_constraint", Severity::Error)?;
        Self::new(rules, xor_severity)
    }

    pub fn validate(&self, bundle: &Bundle) -> ValidationResult {
        let mut result = ValidationResult::new(Level::Bundle);
        let file = bundle.file_path();

        let Some(bundle_type) = bundle.bundle_type.as_deref() else {
            result.add_error(Finding::new("Bundle missing required 'type' field").with_file(file));
            return result;
        };
        let bundle_id = bundle.id_or_unknown();

        if self.rules.xor_constraint.enabled {
            let has_imports = !bundle.imports.is_empty();
            let has_scds = !bundle.scds.is_empty();
            if has_imports == has_scds {
                let message = self.rules.error_messages.render(
                    "xor_violation",
                    &[
                        ("bundle_id", bundle_id.to_string()),
                        ("bundle_type", bundle_type.to_string()),
                        ("imports_count", bundle.imports.len().to_string()),
                        ("scds_count", bundle.scds.len().to_string()),
                    ],
                );
                result.add(self.xor_severity, Finding::new(message).with_file(file));
            }
        }

        match self.rules.bundle_types.get(bundle_type) {
            Some(type_rule) => {
                let lists = [
                    ("imports", bundle.imports.len(), &type_rule.imports),
                    ("scds", bundle.scds.len(), &type_rule.scds),
                ];
                for (field, actual, constraint) in lists {
                    if let Some(constraint) = constraint {
                        self.check_counts(bundle, field, actual, constraint, bundle_type, &mut result);
                    }
                }
            }
            None => result.add_warning(
                Finding::new(format!(
                    "Unknown bundle type '{}' - no validation rules found",
                    bundle_type
                ))
                .with_file(file),
            ),
        }

        if bundle_type == "meta" {
            self.check_meta_version(bundle, &mut result);
        }

        result.set_detail("bundle_type", bundle_type);
        result.set_detail("imports", bundle.imports.len());
        result.set_detail("scds", bundle.scds.len());
        result
    }

    fn check_counts(
        &self,
        bundle: &Bundle,
        field: &str,
        actual: usize,
        constraint: &ArrayConstraint,
        bundle_type: &str,
        result: &mut ValidationResult,
    ) {
        let messages = &self.rules.error_messages;
        let file = bundle.file_path();

        if let Some(min) = constraint.min.filter(|min| actual < *min) {
            let message = messages.render(
                "insufficient_items",
                &[
                    ("field", field.to_string()),
                    ("bundle_type", bundle_type.to_string()),
                    ("actual", actual.to_string()),
                    ("required", min.to_string()),
                ],
            );
            result.add_error(Finding::new(message).with_file(file));
        }

        if let Some(max) = constraint.max.filter(|max| actual > *max) {
            let message = messages.render(
                "excessive_items",
                &[
                    ("field", field.to_string()),
                    ("bundle_type", bundle_type.to_string()),
                    ("actual", actual.to_string()),
                    ("allowed", max.to_string()),
                ],
            );
            result.add_error(Finding::new(message).with_file(file));
        }

        if constraint.required && actual == 0 {
            let message = messages.render(
                "required_field_empty",
                &[
                    ("field", field.to_string()),
                    ("bundle_type", bundle_type.to_string()),
                ],
            );
            result.add_error(Finding::new(message).with_file(file));
        }
    }

    fn check_meta_version(&self, bundle: &Bundle, result: &mut ValidationResult) {
        let (Some(pattern), Some(version)) = (&self.meta_version, bundle.version.as_deref()) else {
            return;
        };
        if !pattern.is_match(version) {
            let message = self.rules.error_messages.render(
                "invalid_meta_version",
                &[
                    ("version", version.to_string()),
                    ("pattern", pattern.as_str().to_string()),
                ],
            );
            result.add_warning(Finding::new(message).with_file(bundle.file_path()));
        }
    }
}
