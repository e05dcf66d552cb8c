//! Rule file discovery and loading.
//!
//! Rule files come either from a rules directory given at runtime or from
//! the defaults embedded at compile time. Parsed files are cached per
//! loader, so one loader should be built per validation run and passed to
//! every validator.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use include_dir::{include_dir, Dir};
use serde::de::DeserializeOwned;
use serde_yaml::Value;

use super::{
    severity_at, BundleRules, CompletenessRules, DocumentRules, RelationshipRules, RuleKind,
};
use crate::error::{Result, ScsError};
use crate::validate::Severity;

/// Embedded default rules.
static RULES_DIR: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/rules");

/// Project-level completeness override, relative to the project root.
const PROJECT_COMPLETENESS_RULES: &str = ".scs/completeness-rules.yaml";

/// Where rule files are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RulesSource {
    /// Defaults compiled into the binary.
    Bundled,
    /// A rules directory on disk.
    Directory(PathBuf),
}

/// Loads and caches the four rule sets.
#[derive(Debug)]
pub struct RulesLoader {
    source: RulesSource,
    cache: HashMap<RuleKind, Value>,
}

impl RulesLoader {
    /// Loader over the embedded defaults.
    pub fn bundled() -> Self {
        Self {
            source: RulesSource::Bundled,
            cache: HashMap::new(),
        }
    }

    /// Loader over a rules directory, which must exist.
    pub fn from_dir(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(ScsError::RulesDirNotFound { path: dir });
        }
        Ok(Self {
            source: RulesSource::Directory(dir),
            cache: HashMap::new(),
        })
    }

    /// Loader over `dir` when given, else the embedded defaults.
    pub fn new(dir: Option<&Path>) -> Result<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Ok(Self::bundled()),
        }
    }

    pub fn source(&self) -> &RulesSource {
        &self.source
    }

    /// Whether a rule file has already been read.
    pub fn is_cached(&self, kind: RuleKind) -> bool {
        self.cache.contains_key(&kind)
    }

    /// Raw rule file contents for `kind`, read once per loader.
    pub fn load(&mut self, kind: RuleKind) -> Result<&Value> {
        if !self.cache.contains_key(&kind) {
            let value = self.read(kind)?;
            self.cache.insert(kind, value);
        }
        self.cache
            .get(&kind)
            .ok_or_else(|| ScsError::RulesNotFound {
                path: PathBuf::from(kind.file_name()),
            })
    }

    fn read(&self, kind: RuleKind) -> Result<Value> {
        let name = kind.file_name();
        match &self.source {
            RulesSource::Bundled => {
                let path = Path::new("rules").join(name);
                let file = RULES_DIR
                    .get_file(name)
                    .ok_or_else(|| ScsError::RulesNotFound { path: path.clone() })?;
                let content = file
                    .contents_utf8()
                    .ok_or_else(|| ScsError::RulesParseError {
                        path: path.clone(),
                        message: "Invalid UTF-8".to_string(),
                    })?;
                tracing::debug!("Loading bundled rules {}", name);
                parse_rules(content, &path)
            }
            RulesSource::Directory(dir) => {
                let path = dir.join(name);
                if !path.is_file() {
                    return Err(ScsError::RulesNotFound { path });
                }
                tracing::debug!("Loading rules from {}", path.display());
                read_rules_file(&path)
            }
        }
    }

    fn typed<T: DeserializeOwned>(&mut self, kind: RuleKind) -> Result<T> {
        let value = self.load(kind)?.clone();
        serde_yaml::from_value(value).map_err(|e| ScsError::RulesParseError {
            path: PathBuf::from(kind.file_name()),
            message: e.to_string(),
        })
    }

    pub fn document_rules(&mut self) -> Result<DocumentRules> {
        self.typed(RuleKind::Document)
    }

    pub fn bundle_rules(&mut self) -> Result<BundleRules> {
        self.typed(RuleKind::Bundle)
    }

    pub fn relationship_rules(&mut self) -> Result<RelationshipRules> {
        self.typed(RuleKind::Relationship)
    }

    /// Resolve the completeness rules.
    ///
    /// Priority:
    /// 1. `custom`, if the file exists
    /// 2. `<project_root>/.scs/completeness-rules.yaml`, if it exists
    /// 3. The loader's own completeness rules
    ///
    /// Only the last one is cached.
    pub fn completeness_rules(
        &mut self,
        custom: Option<&Path>,
        project_root: Option<&Path>,
    ) -> Result<CompletenessRules> {
        if let Some(path) = custom.filter(|p| p.is_file()) {
            tracing::debug!("Using custom completeness rules {}", path.display());
            return typed_file(path);
        }

        if let Some(root) = project_root {
            let path = root.join(PROJECT_COMPLETENESS_RULES);
            if path.is_file() {
                tracing::debug!("Using project completeness rules {}", path.display());
                return typed_file(&path);
            }
        }

        self.typed(RuleKind::Completeness)
    }

    /// Severity configured at a dotted key path in a rule file.
    pub fn severity(&mut self, kind: RuleKind, dotted_key: &str, default: Severity) -> Result<Severity> {
        Ok(severity_at(self.load(kind)?, dotted_key, default))
    }
}

fn read_rules_file(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| ScsError::RulesParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse_rules(&content, path)
}

fn parse_rules(content: &str, path: &Path) -> Result<Value> {
    let value: Value = serde_yaml::from_str(content).map_err(|e| ScsError::RulesParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if !value.is_mapping() {
        return Err(ScsError::RulesParseError {
            path: path.to_path_buf(),
            message: "YAML content must be a mapping".to_string(),
        });
    }
    Ok(value)
}

fn typed_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let value = read_rules_file(path)?;
    serde_yaml::from_value(value).map_err(|e| ScsError::RulesParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn bundled_rules_all_load() {
        let mut loader = RulesLoader::bundled();
        let doc = loader.document_rules().unwrap();
        assert!(doc.version_pattern.pattern.is_some());

        let bundle = loader.bundle_rules().unwrap();
        assert!(bundle.bundle_types.contains_key("project"));

        let rel = loader.relationship_rules().unwrap();
        assert!(rel.is_valid_type("depends-on"));

        let completeness = loader.completeness_rules(None, None).unwrap();
        assert!(!completeness.enabled);
    }

    #[test]
    fn caches_loaded_files() {
        let mut loader = RulesLoader::bundled();
        assert!(!loader.is_cached(RuleKind::Bundle));
        loader.bundle_rules().unwrap();
        assert!(loader.is_cached(RuleKind::Bundle));
        assert!(!loader.is_cached(RuleKind::Document));
    }

    #[test]
    fn missing_rules_dir_is_fatal() {
        let temp = TempDir::new().unwrap();
        let err = RulesLoader::from_dir(temp.path().join("nope")).unwrap_err();
        assert!(matches!(err, ScsError::RulesDirNotFound { .. }));
    }

    #[test]
    fn missing_rules_file_is_fatal() {
        let temp = TempDir::new().unwrap();
        let mut loader = RulesLoader::from_dir(temp.path()).unwrap();
        let err = loader.bundle_rules().unwrap_err();
        assert!(matches!(err, ScsError::RulesNotFound { .. }));
    }

    #[test]
    fn reads_rules_from_directory() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join("bundle-rules.yaml"),
            "xor_constraint:\n  enabled: true\n  severity: warning\n",
        )
        .unwrap();

        let mut loader = RulesLoader::from_dir(temp.path()).unwrap();
        assert_eq!(
            loader.source(),
            &RulesSource::Directory(temp.path().to_path_buf())
        );
        assert_eq!(
            loader
                .severity(RuleKind::Bundle, "xor_constraint", Severity::Error)
                .unwrap(),
            Severity::Warning
        );
    }

    #[test]
    fn non_mapping_rules_are_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("doc-rules.yaml"), "- just\n- a list\n").unwrap();

        let mut loader = RulesLoader::from_dir(temp.path()).unwrap();
        let err = loader.document_rules().unwrap_err();
        assert!(matches!(err, ScsError::RulesParseError { .. }));
    }

    #[test]
    fn completeness_prefers_custom_then_project() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("custom.yaml");
        fs::write(&custom, "enabled: true\nseverity: error\n").unwrap();
        fs::create_dir_all(temp.path().join(".scs")).unwrap();
        fs::write(
            temp.path().join(".scs/completeness-rules.yaml"),
            "enabled: true\nseverity: warning\n",
        )
        .unwrap();

        let mut loader = RulesLoader::bundled();

        let rules = loader
            .completeness_rules(Some(&custom), Some(temp.path()))
            .unwrap();
        assert_eq!(rules.severity, Severity::Error);

        let missing = temp.path().join("missing.yaml");
        let rules = loader
            .completeness_rules(Some(&missing), Some(temp.path()))
            .unwrap();
        assert!(rules.enabled);
        assert_eq!(rules.severity, Severity::Warning);

        let other = TempDir::new().unwrap();
        let rules = loader.completeness_rules(None, Some(other.path())).unwrap();
        assert!(!rules.enabled);
    }

    #[test]
    fn unparsable_custom_completeness_is_fatal() {
        let temp = TempDir::new().unwrap();
        let custom = temp.path().join("custom.yaml");
        fs::write(&custom, "enabled: [unterminated\n").unwrap();

        let mut loader = RulesLoader::bundled();
        assert!(loader.completeness_rules(Some(&custom), None).is_err());
    }
}
