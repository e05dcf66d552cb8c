//! Project completeness and compliance audit.

use std::collections::{HashMap, HashSet};

use super::{Finding, Level, ValidationResult};
use crate::document::{Bundle, Document, ImportKind};
use crate::rules::{fill_template, CompletenessRules};

/// Audits a project bundle and its documents against completeness rules.
pub struct CompletenessValidator {
    rules: CompletenessRules,
}

impl CompletenessValidator {
    pub fn new(rules: CompletenessRules) -> Self {
        Self { rules }
    }

    pub fn is_enabled(&self) -> bool {
        self.rules.enabled
    }

    /// Run the audit. A disabled rule set yields an empty, passing result.
    pub fn validate(&self, bundle: &Bundle, docs: &[Document]) -> ValidationResult {
        let mut result = ValidationResult::new(Level::Completeness);
        if !self.rules.enabled {
            tracing::debug!("Completeness validation disabled");
            return result;
        }

        let file = bundle.file_path();
        self.check_required_bundles(bundle, &mut result);
        self.check_required_domains(bundle, docs, &mut result);
        self.check_recommended_docs(docs, file, &mut result);
        self.detect_stubs(docs, &mut result);
        self.check_compliance(bundle, &mut result);

        result.set_detail("documents", docs.len());
        result
    }

    fn check_required_bundles(&self, bundle: &Bundle, result: &mut ValidationResult) {
        let mut counts: HashMap<ImportKind, usize> = HashMap::new();
        for reference in bundle.import_refs() {
            *counts.entry(reference.kind()).or_default() += 1;
        }

        for requirement in &self.rules.required_bundles {
            let actual = counts.get(&requirement.kind).copied().unwrap_or(0);
            if requirement.is_satisfied(actual) {
                continue;
            }
            let message = match &requirement.message {
                Some(message) => message.clone(),
                None => format!(
                    "Required bundle type '{}' missing",
                    kind_name(requirement.kind)
                ),
            };
            result.add(
                self.rules.severity,
                Finding::new(message).with_file(bundle.file_path()),
            );
        }
    }

    fn check_required_domains(
        &self,
        bundle: &Bundle,
        docs: &[Document],
        result: &mut ValidationResult,
    ) {
        let messages = &self.rules.error_messages;
        let imported: HashSet<String> = bundle
            .import_refs()
            .filter(|r| r.kind() == ImportKind::Domain)
            .map(|r| r.name)
            .collect();

        let mut per_domain: HashMap<&str, usize> = HashMap::new();
        for doc in docs {
            if let Some(domain) = doc.domain.as_deref() {
                *per_domain.entry(domain).or_default() += 1;
            }
        }

        for domain in &self.rules.required_domains {
            let name = domain.display_name().to_string();
            if !imported.contains(&domain.id) {
                let message = messages.render("missing_domain", &[("domain", name)]);
                result.add(
                    self.rules.severity,
                    Finding::new(message).with_file(bundle.file_path()),
                );
                continue;
            }

            let actual = per_domain.get(domain.id.as_str()).copied().unwrap_or(0);
            if actual < domain.minimum_docs {
                let message = messages.render_or_legacy(
                    "insufficient_docs_in_domain",
                    "insufficient_scds_in_domain",
                    &[
                        ("domain", name),
                        ("actual", actual.to_string()),
                        ("required", domain.minimum_docs.to_string()),
                    ],
                );
                result.add(
                    self.rules.severity,
                    Finding::new(message).with_file(bundle.file_path()),
                );
            }
        }
    }

    /// Missing recommended documents are always warnings.
    fn check_recommended_docs(
        &self,
        docs: &[Document],
        file: Option<&std::path::Path>,
        result: &mut ValidationResult,
    ) {
        for domain in &self.rules.required_domains {
            for recommended in &domain.recommended_docs {
                if recommended.pattern.is_empty() {
                    continue;
                }
                let found = docs
                    .iter()
                    .filter_map(|d| d.id.as_deref())
                    .any(|id| recommended.matches(id));
                if !found {
                    let message = self.rules.error_messages.render_or_legacy(
                        "missing_recommended_doc",
                        "missing_recommended_scd",
                        &[
                            ("domain", domain.id.clone()),
                            ("pattern", recommended.pattern.clone()),
                            (
                                "name",
                                recommended
                                    .name
                                    .clone()
                                    .unwrap_or_else(|| recommended.pattern.clone()),
                            ),
                        ],
                    );
                    result.add_warning(Finding::new(message).with_file(file));
                }
            }
        }
    }

    fn detect_stubs(&self, docs: &[Document], result: &mut ValidationResult) {
        let detection = &self.rules.stub_detection;
        if !detection.enabled {
            return;
        }

        for doc in docs.iter().filter(|d| !d.is_draft()) {
            let triggered: Vec<&str> = detection
                .indicators
                .iter()
                .filter(|i| i.is_triggered(doc))
                .map(|i| i.message())
                .collect();
            if triggered.len() < detection.stub_threshold {
                continue;
            }

            let id = doc.id_or_unknown();
            let message = fill_template(
                &detection.warning_message,
                &[
                    ("doc_id", id.to_string()),
                    ("indicators", triggered.join("; ")),
                ],
            )
            .unwrap_or_else(|| detection.warning_message.clone());
            result.add_warning(
                Finding::new(message)
                    .with_doc_id(id)
                    .with_file(doc.file_path()),
            );
        }
    }

    fn check_compliance(&self, bundle: &Bundle, result: &mut ValidationResult) {
        let compliance = &self.rules.compliance_validation;
        if !compliance.enabled {
            return;
        }
        for rule in &compliance.checks {
            if rule.check.is_satisfied(bundle) {
                continue;
            }
            let message = self.rules.error_messages.render(rule.check.message_key(), &[]);
            result.add(rule.severity, Finding::new(message).with_file(bundle.file_path()));
        }
    }
}

fn kind_name(kind: ImportKind) -> &'static str {
    match kind {
        ImportKind::Meta => "meta",
        ImportKind::Standards => "standards",
        ImportKind::Domain => "domain",
    }
}
