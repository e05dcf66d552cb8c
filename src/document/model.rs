//! Typed document and bundle values.
//!
//! Known fields are lifted out of the parsed map into typed slots only when
//! they carry the expected JSON type. Everything else, including known fields
//! with the wrong type, stays in `extra` so [`Document::to_value`] and
//! [`Bundle::to_value`] give back the map exactly as it was written.
//! Relationship entries are lifted one by one; entries that are not mappings
//! are kept aside with their position.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::id::{tier_of, BundleRef, Tier};
use super::parser::SourceFile;
use super::version::DRAFT;

fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(_)) => match map.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        _ => None,
    }
}

/// Take a non-empty array of strings; anything else stays in the map.
fn take_string_list(map: &mut Map<String, Value>, key: &str) -> Option<Vec<String>> {
    let all_strings = match map.get(key) {
        Some(Value::Array(items)) => !items.is_empty() && items.iter().all(Value::is_string),
        _ => false,
    };
    if !all_strings {
        return None;
    }
    match map.remove(key) {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    }
}

fn put_string(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(v) = value {
        map.insert(key.to_string(), Value::String(v.clone()));
    }
}

/// Authorship and history of a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Provenance {
    pub created_by: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub rationale: Option<String>,
    pub extra: Map<String, Value>,
}

impl Provenance {
    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            created_by: take_string(&mut map, "created_by"),
            created_at: take_string(&mut map, "created_at"),
            updated_at: take_string(&mut map, "updated_at"),
            rationale: take_string(&mut map, "rationale"),
            extra: map,
        }
    }

    /// Whether the provenance block has no fields at all.
    pub fn is_empty(&self) -> bool {
        self.created_by.is_none()
            && self.created_at.is_none()
            && self.updated_at.is_none()
            && self.rationale.is_none()
            && self.extra.is_empty()
    }

    fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        put_string(&mut map, "created_by", &self.created_by);
        put_string(&mut map, "created_at", &self.created_at);
        put_string(&mut map, "updated_at", &self.updated_at);
        put_string(&mut map, "rationale", &self.rationale);
        Value::Object(map)
    }
}

/// A typed edge from one document to another.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationship {
    pub rel_type: Option<String>,
    pub target: Option<String>,
    pub extra: Map<String, Value>,
}

impl Relationship {
    /// Create a relationship edge.
    pub fn new(rel_type: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            rel_type: Some(rel_type.into()),
            target: Some(target.into()),
            extra: Map::new(),
        }
    }

    fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            rel_type: take_string(&mut map, "type"),
            target: take_string(&mut map, "target"),
            extra: map,
        }
    }

    fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        put_string(&mut map, "type", &self.rel_type);
        put_string(&mut map, "target", &self.target);
        Value::Object(map)
    }
}

/// A single structured specification document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub id: Option<String>,
    pub doc_type: Option<String>,
    pub version: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub domain: Option<String>,
    pub provenance: Option<Provenance>,
    pub relationships: Vec<Relationship>,
    /// Entries of `relationships` that are not mappings, with their index.
    pub malformed_relationships: Vec<(usize, Value)>,
    pub content: Option<Value>,
    /// Fields not lifted into a typed slot, passed through untouched.
    pub extra: Map<String, Value>,
    /// File the document was loaded from, if any.
    pub path: Option<PathBuf>,
}

impl Document {
    /// Build a document from a parsed top-level map.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let provenance = match map.get("provenance") {
            Some(Value::Object(_)) => match map.remove("provenance") {
                Some(Value::Object(p)) => Some(Provenance::from_map(p)),
                _ => None,
            },
            _ => None,
        };

        let mut relationships = Vec::new();
        let mut malformed_relationships = Vec::new();
        let lift = matches!(
            map.get("relationships"),
            Some(Value::Array(items)) if !items.is_empty()
        );
        if lift {
            if let Some(Value::Array(items)) = map.remove("relationships") {
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(m) => relationships.push(Relationship::from_map(m)),
                        other => malformed_relationships.push((index, other)),
                    }
                }
            }
        }

        Self {
            id: take_string(&mut map, "id"),
            doc_type: take_string(&mut map, "type"),
            version: take_string(&mut map, "version"),
            title: take_string(&mut map, "title"),
            description: take_string(&mut map, "description"),
            domain: take_string(&mut map, "domain"),
            provenance,
            relationships,
            malformed_relationships,
            content: map.remove("content"),
            extra: map,
            path: None,
        }
    }

    /// Build a document from a loaded file, remembering its path.
    pub fn from_source(source: SourceFile) -> Self {
        let mut doc = Self::from_map(source.data);
        doc.path = Some(source.path);
        doc
    }

    /// Reassemble the full field map.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        put_string(&mut map, "id", &self.id);
        put_string(&mut map, "type", &self.doc_type);
        put_string(&mut map, "version", &self.version);
        put_string(&mut map, "title", &self.title);
        put_string(&mut map, "description", &self.description);
        put_string(&mut map, "domain", &self.domain);
        if let Some(provenance) = &self.provenance {
            map.insert("provenance".to_string(), provenance.to_value());
        }
        if !self.relationships.is_empty() || !self.malformed_relationships.is_empty() {
            let mut edges = self.relationships.iter().map(Relationship::to_value);
            let mut malformed = self.malformed_relationships.iter().peekable();
            let total = self.relationships.len() + self.malformed_relationships.len();
            let items = (0..total)
                .filter_map(|index| match malformed.next_if(|(at, _)| *at == index) {
                    Some((_, value)) => Some(value.clone()),
                    None => edges.next(),
                })
                .collect();
            map.insert("relationships".to_string(), Value::Array(items));
        }
        if let Some(content) = &self.content {
            map.insert("content".to_string(), content.clone());
        }
        Value::Object(map)
    }

    /// The document id, or `"unknown"` when absent.
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }

    /// Tier derived from the id.
    pub fn tier(&self) -> Option<Tier> {
        self.id.as_deref().and_then(tier_of)
    }

    /// Whether the document carries the `DRAFT` version sentinel.
    pub fn is_draft(&self) -> bool {
        self.version.as_deref() == Some(DRAFT)
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// An aggregation of bundle imports or document references.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bundle {
    pub id: Option<String>,
    pub bundle_type: Option<String>,
    pub version: Option<String>,
    pub imports: Vec<String>,
    pub scds: Vec<String>,
    pub extra: Map<String, Value>,
    pub path: Option<PathBuf>,
}

impl Bundle {
    /// Build a bundle from a parsed top-level map.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        Self {
            id: take_string(&mut map, "id"),
            bundle_type: take_string(&mut map, "type"),
            version: take_string(&mut map, "version"),
            imports: take_string_list(&mut map, "imports").unwrap_or_default(),
            scds: take_string_list(&mut map, "scds").unwrap_or_default(),
            extra: map,
            path: None,
        }
    }

    /// Build a bundle from a loaded file, remembering its path.
    pub fn from_source(source: SourceFile) -> Self {
        let mut bundle = Self::from_map(source.data);
        bundle.path = Some(source.path);
        bundle
    }

    /// Reassemble the full field map.
    pub fn to_value(&self) -> Value {
        let mut map = self.extra.clone();
        put_string(&mut map, "id", &self.id);
        put_string(&mut map, "type", &self.bundle_type);
        put_string(&mut map, "version", &self.version);
        if !self.imports.is_empty() {
            map.insert(
                "imports".to_string(),
                Value::Array(self.imports.iter().cloned().map(Value::String).collect()),
            );
        }
        if !self.scds.is_empty() {
            map.insert(
                "scds".to_string(),
                Value::Array(self.scds.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(map)
    }

    /// The bundle id, or `"unknown"` when absent.
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or("unknown")
    }

    /// Imports that parse as bundle references.
    pub fn import_refs(&self) -> impl Iterator<Item = BundleRef> + '_ {
        self.imports.iter().filter_map(|i| BundleRef::parse(i))
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn document_lifts_known_fields() {
        let doc = Document::from_map(object(json!({
            "id": "doc:project:authn-authz",
            "type": "project",
            "version": "1.0.0",
            "title": "Authentication",
            "description": "How users sign in",
            "domain": "security",
            "provenance": {"created_by": "alice", "created_at": "2024-01-01"},
            "relationships": [{"type": "depends-on", "target": "doc:standards:encryption-policy"}],
            "content": {"flows": []},
            "owner": "team-a"
        })));

        assert_eq!(doc.id.as_deref(), Some("doc:project:authn-authz"));
        assert_eq!(doc.tier(), Some(Tier::Project));
        assert_eq!(doc.domain.as_deref(), Some("security"));
        assert_eq!(
            doc.provenance.as_ref().unwrap().created_by.as_deref(),
            Some("alice")
        );
        assert_eq!(doc.relationships.len(), 1);
        assert_eq!(doc.extra["owner"], "team-a");
        assert!(!doc.is_draft());
    }

    #[test]
    fn document_round_trips_to_value() {
        let original = json!({
            "id": "doc:meta:roles",
            "type": "meta",
            "version": 3,
            "title": "Roles",
            "relationships": "not-a-list",
            "provenance": {"created_by": "bob", "team": "core"},
            "custom": {"nested": true}
        });
        let doc = Document::from_map(object(original.clone()));

        assert!(doc.version.is_none());
        assert!(doc.relationships.is_empty());
        assert_eq!(doc.to_value(), original);
    }

    #[test]
    fn mixed_relationship_entries_are_lifted_individually() {
        let original = json!({
            "id": "doc:project:a",
            "relationships": [
                "doc:project:junk",
                {"type": "depends-on", "target": "doc:project:b"},
                42,
                {"type": "references", "target": "doc:meta:roles"}
            ]
        });
        let doc = Document::from_map(object(original.clone()));

        assert_eq!(doc.relationships.len(), 2);
        assert_eq!(doc.relationships[0].target.as_deref(), Some("doc:project:b"));
        assert_eq!(
            doc.malformed_relationships,
            vec![(0, json!("doc:project:junk")), (2, json!(42))]
        );
        assert!(!doc.extra.contains_key("relationships"));
        assert_eq!(doc.to_value(), original);
    }

    #[test]
    fn draft_sentinel_detected() {
        let doc = Document::from_map(object(json!({"version": "DRAFT"})));
        assert!(doc.is_draft());
    }

    #[test]
    fn bundle_reads_imports_and_scds() {
        let bundle = Bundle::from_map(object(json!({
            "id": "bundle:project",
            "type": "project",
            "version": "1.0.0",
            "imports": ["bundle:meta:1.0", "bundle:security:1.0"]
        })));

        assert_eq!(bundle.imports.len(), 2);
        assert!(bundle.scds.is_empty());
        let refs: Vec<_> = bundle.import_refs().map(|r| r.name).collect();
        assert_eq!(refs, vec!["meta", "security"]);
    }

    #[test]
    fn empty_lists_stay_in_extra() {
        let original = json!({
            "type": "domain",
            "imports": [],
            "scds": []
        });
        let bundle = Bundle::from_map(object(original.clone()));
        assert!(bundle.imports.is_empty());
        assert!(bundle.scds.is_empty());
        assert_eq!(bundle.to_value(), original);
    }

    #[test]
    fn bundle_round_trips_to_value() {
        let original = json!({
            "id": "bundle:security",
            "type": "domain",
            "version": "1.0.0",
            "scds": ["doc:project:authn-authz"],
            "imports": [1, 2]
        });
        let bundle = Bundle::from_map(object(original.clone()));

        assert!(bundle.imports.is_empty());
        assert_eq!(bundle.to_value(), original);
    }
}
