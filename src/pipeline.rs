//! Validation pipeline.
//!
//! Composes the validators into the two run modes of the `validate` command:
//!
//! - **Files**: each path is parsed, schema-checked and semantically checked.
//!   Levels reported: syntax, schema, semantic.
//! - **Bundle**: the bundle is parsed and schema-checked, its composition is
//!   validated, the documents it references are resolved on disk, and the
//!   whole set goes through semantic, relationship and completeness checks.
//!
//! Files that cannot be parsed become syntax findings. Referenced bundles and
//! documents that do not exist on disk are skipped and recorded as notes.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::document::{load_bundle, load_document, Bundle, DocId, Document};
use crate::error::{Result, ScsError};
use crate::rules::RulesLoader;
use crate::validate::{
    BundleValidator, CompletenessValidator, Finding, Level, RelationshipValidator,
    SchemaValidator, SemanticValidator, Span, ValidationResult,
};

const EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Options for a validation run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root of the JSON Schema files.
    pub schema_dir: PathBuf,
    /// Rules directory; bundled defaults when `None`.
    pub rules_dir: Option<PathBuf>,
    /// Explicit completeness rules file.
    pub completeness_rules: Option<PathBuf>,
    pub skip_completeness: bool,
    /// Treat unresolved relationship targets as errors for every bundle type.
    pub strict_references: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            schema_dir: PathBuf::from("schema"),
            rules_dir: None,
            completeness_rules: None,
            skip_completeness: false,
            strict_references: false,
        }
    }
}

/// Outcome of a run: ordered level results plus progress notes.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub results: Vec<ValidationResult>,
    pub notes: Vec<String>,
}

/// Runs validation levels in order over files or a bundle.
pub struct ValidationPipeline {
    options: PipelineOptions,
    loader: RulesLoader,
    schema: SchemaValidator,
    semantic: SemanticValidator,
}

impl ValidationPipeline {
    /// Set up the pipeline.
    ///
    /// # Errors
    ///
    /// Fails when the schema or rules directory does not exist, or when the
    /// document rules cannot be loaded.
    pub fn new(options: PipelineOptions) -> Result<Self> {
        let schema = SchemaValidator::new(options.schema_dir.clone())?;
        let mut loader = RulesLoader::new(options.rules_dir.as_deref())?;
        let semantic = SemanticValidator::new(loader.document_rules()?)?;

        Ok(Self {
            options,
            loader,
            schema,
            semantic,
        })
    }

    /// Validate individual document files.
    pub fn validate_files(&mut self, paths: &[PathBuf]) -> Result<PipelineReport> {
        if paths.is_empty() {
            return Err(ScsError::NoInput);
        }

        let mut syntax = ValidationResult::new(Level::Syntax);
        let mut schema = ValidationResult::new(Level::Schema);
        let mut semantic = ValidationResult::new(Level::Semantic);
        let mut notes = Vec::new();
        let mut files_checked = 0;

        for path in paths {
            note(&mut notes, format!("Validating {}...", path.display()));

            let doc = match load_document(path) {
                Ok(doc) => doc,
                Err(e) => {
                    syntax.add_error(syntax_finding(e)?);
                    continue;
                }
            };
            files_checked += 1;

            schema.absorb(self.schema.validate_document(&doc));
            semantic.absorb(self.semantic.validate(&doc));
        }

        let mut results = vec![syntax, schema, semantic];
        for result in &mut results {
            result.set_detail("files_checked", files_checked);
        }

        Ok(PipelineReport { results, notes })
    }

    /// Validate a bundle and everything it references.
    pub fn validate_bundle(&mut self, path: &Path) -> Result<PipelineReport> {
        let mut syntax = ValidationResult::new(Level::Syntax);
        let mut notes = Vec::new();

        note(&mut notes, format!("Validating bundle {}...", path.display()));

        let bundle = match load_bundle(path) {
            Ok(bundle) => bundle,
            Err(e) => {
                syntax.add_error(syntax_finding(e)?);
                return Ok(PipelineReport {
                    results: vec![syntax],
                    notes,
                });
            }
        };
        let bundle_type = bundle.bundle_type.as_deref().unwrap_or("unknown").to_string();
        note(&mut notes, format!("Bundle ID: {}", bundle.id_or_unknown()));
        note(&mut notes, format!("Bundle Type: {}", bundle_type));

        let mut bundle_schema = self.schema.validate_bundle(&bundle);
        if !bundle_schema.passed() {
            return Ok(PipelineReport {
                results: vec![syntax, bundle_schema],
                notes,
            });
        }

        let bundle_result = BundleValidator::from_loader(&mut self.loader)?.validate(&bundle);

        let bundle_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let root = project_root(bundle_dir);

        let refs = if bundle_type == "project" {
            let mut imports = ImportedBundles {
                schema: &mut self.schema,
                bundle_schema: &mut bundle_schema,
                syntax: &mut syntax,
                notes: &mut notes,
            };
            imports.collect_refs(&bundle, bundle_dir)?
        } else {
            bundle.scds.clone()
        };

        let docs = load_documents(&refs, root, &mut syntax, &mut notes)?;
        note(&mut notes, format!("Successfully loaded {} documents", docs.len()));

        let mut semantic = ValidationResult::new(Level::Semantic);
        for doc in &docs {
            semantic.absorb(self.semantic.validate(doc));
        }
        semantic.set_detail("documents", docs.len());

        let mut results = vec![syntax, bundle_schema, semantic, bundle_result];

        if !docs.is_empty() {
            let relationships = RelationshipValidator::new(self.loader.relationship_rules()?)
                .with_strict_references(self.options.strict_references)
                .validate(&docs, &bundle_type);
            results.push(relationships);
        }

        if self.options.skip_completeness {
            note(
                &mut notes,
                "Skipping completeness validation (--skip-completeness)".to_string(),
            );
        } else if bundle_type == "project" {
            let rules = self
                .loader
                .completeness_rules(self.options.completeness_rules.as_deref(), Some(root))?;
            let completeness = CompletenessValidator::new(rules);
            if completeness.is_enabled() {
                results.push(completeness.validate(&bundle, &docs));
            } else {
                note(&mut notes, "Completeness validation is disabled".to_string());
            }
        }

        Ok(PipelineReport { results, notes })
    }
}

/// Findings and notes collected while loading the bundles a project imports.
struct ImportedBundles<'a> {
    schema: &'a mut SchemaValidator,
    bundle_schema: &'a mut ValidationResult,
    syntax: &'a mut ValidationResult,
    notes: &'a mut Vec<String>,
}

impl ImportedBundles<'_> {
    /// Document references listed by the imported bundles. An imported bundle
    /// that fails the bundle schema adds its findings to the bundle schema
    /// level and contributes no documents.
    fn collect_refs(&mut self, bundle: &Bundle, bundle_dir: &Path) -> Result<Vec<String>> {
        note(
            self.notes,
            format!("Loading {} imported bundles...", bundle.imports.len()),
        );

        let mut refs = Vec::new();
        for import in bundle.import_refs() {
            let Some(path) = find_bundle_file(bundle_dir, &import.name) else {
                note(self.notes, format!("  Imported bundle not found: {}", import.name));
                continue;
            };
            let imported = match load_bundle(&path) {
                Ok(imported) => imported,
                Err(e) => {
                    self.syntax.add_error(syntax_finding(e)?);
                    continue;
                }
            };

            let schema = self.schema.validate_bundle(&imported);
            if !schema.passed() {
                note(
                    self.notes,
                    format!("  Skipping {}: bundle schema validation failed", import.name),
                );
                self.bundle_schema.absorb(schema);
                continue;
            }

            note(
                self.notes,
                format!("  Loaded {}: {} documents", import.name, imported.scds.len()),
            );
            refs.extend(imported.scds);
        }
        Ok(refs)
    }
}

/// Project root for a bundle directory: the parent of a `bundles`
/// directory, else the directory itself.
pub fn project_root(bundle_dir: &Path) -> &Path {
    if bundle_dir.file_name().is_some_and(|n| n == "bundles") {
        bundle_dir.parent().unwrap_or(bundle_dir)
    } else {
        bundle_dir
    }
}

/// Locate an imported bundle file by name.
pub fn find_bundle_file(bundle_dir: &Path, name: &str) -> Option<PathBuf> {
    find_with_extension(&bundle_dir.join("domains"), name)
        .or_else(|| find_with_extension(bundle_dir, name))
}

/// Locate the file of a document id below a project root.
pub fn find_document_file(project_root: &Path, id: &DocId) -> Option<PathBuf> {
    find_with_extension(
        &project_root.join("context").join(id.tier.as_str()),
        &id.name,
    )
}

fn find_with_extension(dir: &Path, name: &str) -> Option<PathBuf> {
    EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{}.{}", name, ext)))
        .find(|p| p.is_file())
}

fn load_documents(
    refs: &[String],
    root: &Path,
    syntax: &mut ValidationResult,
    notes: &mut Vec<String>,
) -> Result<Vec<Document>> {
    if !refs.is_empty() {
        note(notes, format!("Loading {} documents...", refs.len()));
    }

    let mut seen = HashSet::new();
    let mut docs = Vec::new();
    for reference in refs {
        if !seen.insert(reference.as_str()) {
            continue;
        }
        let Some(id) = DocId::parse(reference) else {
            note(notes, format!("  Unrecognised document reference: {}", reference));
            continue;
        };
        let Some(path) = find_document_file(root, &id) else {
            note(notes, format!("  Document file not found for {}", reference));
            continue;
        };
        match load_document(&path) {
            Ok(doc) => docs.push(doc),
            Err(e) => syntax.add_error(syntax_finding(e)?),
        }
    }
    Ok(docs)
}

fn note(notes: &mut Vec<String>, message: String) {
    tracing::debug!("{}", message);
    notes.push(message);
}

/// Turn a parser failure into a syntax finding; other errors pass through.
fn syntax_finding(error: ScsError) -> Result<Finding> {
    match error {
        ScsError::Syntax {
            path,
            line,
            column,
            message,
        } => {
            let finding = Finding::new(message).with_file(Some(&path));
            Ok(match line {
                Some(line) => finding.with_span(Span { line, column }),
                None => finding,
            })
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn project_root_skips_bundles_directory() {
        assert_eq!(project_root(Path::new("/p/bundles")), Path::new("/p"));
        assert_eq!(project_root(Path::new("/p/context")), Path::new("/p/context"));
    }

    #[test]
    fn bundle_lookup_prefers_domains_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("domains")).unwrap();
        fs::write(temp.path().join("security.yaml"), "id: a").unwrap();
        fs::write(temp.path().join("domains/security.yml"), "id: b").unwrap();
        fs::write(temp.path().join("meta.json"), "{}").unwrap();

        assert_eq!(
            find_bundle_file(temp.path(), "security").unwrap(),
            temp.path().join("domains/security.yml")
        );
        assert_eq!(
            find_bundle_file(temp.path(), "meta").unwrap(),
            temp.path().join("meta.json")
        );
        assert!(find_bundle_file(temp.path(), "missing").is_none());
    }

    #[test]
    fn document_lookup_uses_tier_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("context/project")).unwrap();
        fs::write(temp.path().join("context/project/authn.yaml"), "id: x").unwrap();

        let id = DocId::parse("doc:project:authn").unwrap();
        assert_eq!(
            find_document_file(temp.path(), &id).unwrap(),
            temp.path().join("context/project/authn.yaml")
        );
        let other = DocId::parse("doc:meta:authn").unwrap();
        assert!(find_document_file(temp.path(), &other).is_none());
    }

    #[test]
    fn syntax_errors_become_findings() {
        let finding = syntax_finding(ScsError::Syntax {
            path: PathBuf::from("a.yaml"),
            line: Some(2),
            column: Some(5),
            message: "Invalid YAML syntax".to_string(),
        })
        .unwrap();
        assert_eq!(finding.to_string(), "a.yaml:2:5 - Invalid YAML syntax");

        assert!(syntax_finding(ScsError::NoInput).is_err());
    }

    #[test]
    fn missing_schema_dir_fails_setup() {
        let options = PipelineOptions {
            schema_dir: PathBuf::from("/nonexistent/schema"),
            ..Default::default()
        };
        let err = ValidationPipeline::new(options).err().unwrap();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn empty_file_list_is_no_input() {
        let temp = TempDir::new().unwrap();
        let mut pipeline = ValidationPipeline::new(PipelineOptions {
            schema_dir: temp.path().to_path_buf(),
            ..Default::default()
        })
        .unwrap();
        assert!(matches!(
            pipeline.validate_files(&[]),
            Err(ScsError::NoInput)
        ));
    }
}
