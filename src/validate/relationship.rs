//! Relationship integrity and dependency cycle detection.
//!
//! Every relationship edge is checked for a known type, a target other than
//! its source, a resolvable target and an allowed tier pair. Edges of the
//! dependency type additionally form a graph that is searched for cycles.
//!
//! Project bundles are closed-world: a target that is not among the loaded
//! documents is an error. Other bundles may reference documents that live in
//! bundles that were not loaded, so an unresolved target is only a warning
//! there unless strict references are requested.

use std::collections::HashMap;

use serde_json::Value;

use super::{Finding, Level, ValidationResult};
use crate::document::{tier_of, Document, Relationship};
use crate::rules::RelationshipRules;

/// Validates relationships across a set of documents.
pub struct RelationshipValidator {
    rules: RelationshipRules,
    strict_references: bool,
}

impl RelationshipValidator {
    pub fn new(rules: RelationshipRules) -> Self {
        Self {
            rules,
            strict_references: false,
        }
    }

    /// Treat unresolved targets as errors for every bundle type.
    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    /// Validate all relationships of `docs`, which came from a bundle of
    /// `bundle_type`.
    pub fn validate(&self, docs: &[Document], bundle_type: &str) -> ValidationResult {
        let mut result = ValidationResult::new(Level::Relationships);

        let lookup: HashMap<&str, &Document> = docs
            .iter()
            .filter_map(|d| d.id.as_deref().map(|id| (id, d)))
            .collect();
        let closed_world = self.strict_references || bundle_type == "project";

        let mut edges = 0;
        for doc in docs {
            let Some(source) = doc.id.as_deref() else {
                continue;
            };
            for rel in &doc.relationships {
                edges += 1;
                self.check_edge(doc, source, rel, &lookup, closed_world, &mut result);
            }
            check_shape(doc, source, &mut result);
        }

        if self.rules.circular_dependency_detection.enabled {
            self.detect_cycles(docs, &mut result);
        }

        result.set_detail("documents", docs.len());
        result.set_detail("relationships", edges);
        result
    }

    fn check_edge(
        &self,
        doc: &Document,
        source: &str,
        rel: &Relationship,
        lookup: &HashMap<&str, &Document>,
        closed_world: bool,
        result: &mut ValidationResult,
    ) {
        let messages = &self.rules.error_messages;
        let finding = |message: String| {
            Finding::new(message)
                .with_doc_id(source)
                .with_file(doc.file_path())
        };
        let rel_type = rel.rel_type.as_deref().unwrap_or("").trim();

        let type_ok = if rel_type.is_empty() {
            result.add_error(finding(
                messages.render("missing_type", &[("doc_id", source.to_string())]),
            ));
            false
        } else if !self.rules.is_valid_type(rel_type) {
            result.add_error(finding(messages.render(
                "invalid_type",
                &[
                    ("type", rel_type.to_string()),
                    ("allowed_types", self.rules.type_names().join(", ")),
                ],
            )));
            false
        } else {
            true
        };

        let Some(target) = rel.target.as_deref().filter(|t| !t.trim().is_empty()) else {
            result.add_error(finding(
                messages.render("missing_target", &[("doc_id", source.to_string())]),
            ));
            return;
        };

        // Reported whether or not the type is valid.
        if target == source {
            result.add_error(finding(messages.render(
                "self_reference",
                &[
                    ("doc_id", source.to_string()),
                    ("type", rel_type.to_string()),
                ],
            )));
            return;
        }

        if !type_ok {
            return;
        }

        if !lookup.contains_key(target) {
            let vars = [
                ("target", target.to_string()),
                ("source", source.to_string()),
                ("type", rel_type.to_string()),
            ];
            if closed_world {
                result.add_error(finding(messages.render("target_not_found", &vars)));
            } else {
                result.add_warning(finding(messages.render("target_not_in_bundle", &vars)));
            }
            return;
        }

        let (Some(from), Some(to)) = (tier_of(source), tier_of(target)) else {
            return;
        };
        if !self.rules.is_valid_tier_combination(rel_type, from, to) {
            result.add_error(finding(messages.render(
                "tier_constraint_violation",
                &[
                    ("type", rel_type.to_string()),
                    ("from_tier", from.to_string()),
                    ("to_tier", to.to_string()),
                    ("allowed", self.rules.allowed_combinations(rel_type).join(", ")),
                ],
            )));
        }
    }

    /// Warn once per back-edge in the dependency graph.
    ///
    /// Iterative depth-first search with an explicit frame stack and a
    /// single path buffer. Every node is finished at most once.
    fn detect_cycles(&self, docs: &[Document], result: &mut ValidationResult) {
        let dependency_type = self.rules.circular_dependency_detection.relationship_type.as_str();

        let mut order: Vec<&str> = Vec::new();
        let mut graph: HashMap<&str, Vec<&str>> = HashMap::new();
        for doc in docs {
            let Some(id) = doc.id.as_deref() else {
                continue;
            };
            let targets: Vec<&str> = doc
                .relationships
                .iter()
                .filter(|r| r.rel_type.as_deref() == Some(dependency_type))
                .filter_map(|r| r.target.as_deref())
                .filter(|t| !t.is_empty())
                .collect();
            if targets.is_empty() {
                continue;
            }
            let entry = graph.entry(id).or_insert_with(|| {
                order.push(id);
                Vec::new()
            });
            for target in targets {
                if !entry.contains(&target) {
                    entry.push(target);
                }
            }
        }

        let files: HashMap<&str, &Document> = docs
            .iter()
            .filter_map(|d| d.id.as_deref().map(|id| (id, d)))
            .collect();

        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            OnPath,
            Done,
        }

        let mut marks: HashMap<&str, Mark> = HashMap::new();
        let mut path: Vec<&str> = Vec::new();
        // (node, index of the next neighbour to visit)
        let mut frames: Vec<(&str, usize)> = Vec::new();

        for &start in &order {
            if marks.contains_key(start) {
                continue;
            }
            marks.insert(start, Mark::OnPath);
            path.push(start);
            frames.push((start, 0));

            while let Some(&(node, next)) = frames.last() {
                let neighbours = graph.get(node).map(Vec::as_slice).unwrap_or(&[]);
                let Some(&neighbour) = neighbours.get(next) else {
                    marks.insert(node, Mark::Done);
                    path.pop();
                    frames.pop();
                    continue;
                };
                if let Some(frame) = frames.last_mut() {
                    frame.1 += 1;
                }

                match marks.get(neighbour) {
                    None => {
                        marks.insert(neighbour, Mark::OnPath);
                        path.push(neighbour);
                        frames.push((neighbour, 0));
                    }
                    Some(Mark::OnPath) => {
                        let begin = path.iter().position(|n| *n == neighbour).unwrap_or(0);
                        let mut cycle = path[begin..].to_vec();
                        cycle.push(neighbour);

                        let message = self.rules.error_messages.render(
                            "circular_dependency",
                            &[("cycle", cycle.join(" → "))],
                        );
                        let file = files.get(neighbour).and_then(|d| d.file_path());
                        result.add_warning(
                            Finding::new(message).with_doc_id(neighbour).with_file(file),
                        );
                    }
                    Some(Mark::Done) => {}
                }
            }
        }
    }
}

/// Report a `relationships` value that is not a list, and list entries that
/// are not mappings. Neither reaches the edge checks.
fn check_shape(doc: &Document, source: &str, result: &mut ValidationResult) {
    let finding = |message: String| {
        Finding::new(message)
            .with_doc_id(source)
            .with_file(doc.file_path())
    };
    match doc.extra.get("relationships") {
        Some(Value::Array(items)) if items.is_empty() => {}
        Some(_) => result.add_error(finding(format!(
            "Relationships in '{}' must be a list",
            source
        ))),
        None => {}
    }
    for (index, _) in &doc.malformed_relationships {
        result.add_error(finding(format!(
            "Relationship entry {} in '{}' is not a mapping",
            index, source
        )));
    }
}
