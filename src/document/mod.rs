//! Documents, bundles and the files they are loaded from.
//!
//! - [`parser`] - YAML/JSON loading with syntax error locations
//! - [`model`] - Typed [`Document`] and [`Bundle`] values
//! - [`id`] - Document id and bundle reference grammars
//! - [`version`] - Semantic version parsing

pub mod id;
pub mod model;
pub mod parser;
pub mod version;

pub use id::{tier_of, BundleRef, DocId, ImportKind, Tier};
pub use model::{Bundle, Document, Provenance, Relationship};
pub use parser::{load, load_schema, SourceFile};
pub use version::{SemVer, DRAFT};

use std::path::Path;

use crate::error::Result;

/// Load a document file.
pub fn load_document(path: &Path) -> Result<Document> {
    load(path).map(Document::from_source)
}

/// Load a bundle file.
pub fn load_bundle(path: &Path) -> Result<Bundle> {
    load(path).map(Bundle::from_source)
}
