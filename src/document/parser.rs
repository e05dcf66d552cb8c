//! Loading document, bundle and schema files.
//!
//! Every file is parsed into a generic JSON object map first. Typed views
//! ([`Document`](super::Document), [`Bundle`](super::Bundle)) are built on
//! top of it so the raw map stays available for schema validation.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use crate::error::{Result, ScsError};

/// A parsed file: its path and top-level mapping.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub data: Map<String, Value>,
}

/// Load a YAML or JSON file into a [`SourceFile`].
///
/// `.yaml`/`.yml` files are parsed as YAML and `.json` files as JSON. Any
/// other extension is tried as YAML first, then as JSON.
///
/// # Errors
///
/// Returns [`ScsError::Syntax`] when the file is missing or unreadable,
/// when its content does not parse, or when the top level is not a mapping.
/// Parse errors carry 1-based line and column numbers when available.
pub fn load(path: &Path) -> Result<SourceFile> {
    if !path.exists() {
        return Err(ScsError::syntax(
            path,
            format!("File not found: {}", path.display()),
        ));
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ScsError::syntax(path, format!("Failed to load file: {}", e)))?;

    let data = match extension(path).as_deref() {
        Some("yaml") | Some("yml") => parse_yaml(&content, path)?,
        Some("json") => parse_json(&content, path)?,
        _ => match parse_yaml(&content, path) {
            Ok(data) => data,
            Err(_) => parse_json(&content, path)?,
        },
    };

    tracing::debug!("Loaded {} ({} top-level keys)", path.display(), data.len());

    Ok(SourceFile {
        path: path.to_path_buf(),
        data,
    })
}

/// Load a JSON Schema file.
///
/// # Errors
///
/// Returns [`ScsError::SchemaNotFound`] if the file does not exist and
/// [`ScsError::SchemaInvalid`] if it is not valid JSON.
pub fn load_schema(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Err(ScsError::SchemaNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| ScsError::SchemaInvalid {
        path: path.to_path_buf(),
        message: format!(
            "Invalid JSON schema at line {}, column {}: {}",
            e.line(),
            e.column(),
            e
        ),
    })
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Parse YAML content into a top-level mapping.
pub fn parse_yaml(content: &str, path: &Path) -> Result<Map<String, Value>> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| {
        let location = e.location();
        ScsError::Syntax {
            path: path.to_path_buf(),
            line: location.as_ref().map(|l| l.line()),
            column: location.as_ref().map(|l| l.column()),
            message: format!("Invalid YAML syntax: {}", e),
        }
    })?;

    if !yaml.is_mapping() {
        return Err(ScsError::syntax(
            path,
            "YAML content must be an object/dictionary",
        ));
    }

    match serde_json::to_value(&yaml) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ScsError::syntax(
            path,
            "YAML content must be an object/dictionary",
        )),
        Err(e) => Err(ScsError::syntax(
            path,
            format!("YAML content cannot be represented as JSON: {}", e),
        )),
    }
}

/// Parse JSON content into a top-level object.
pub fn parse_json(content: &str, path: &Path) -> Result<Map<String, Value>> {
    let value: Value = serde_json::from_str(content).map_err(|e| ScsError::Syntax {
        path: path.to_path_buf(),
        line: Some(e.line()),
        column: Some(e.column()),
        message: format!("Invalid JSON syntax: {}", e),
    })?;

    match value {
        Value::Object(map) => Ok(map),
        _ => Err(ScsError::syntax(path, "JSON content must be an object")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_yaml_mapping() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "doc.yaml", "id: doc:meta:roles\ntype: meta\n");

        let source = load(&path).unwrap();
        assert_eq!(source.data["id"], "doc:meta:roles");
        assert_eq!(source.path, path);
    }

    #[test]
    fn loads_json_object() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "doc.json", r#"{"id": "doc:meta:roles"}"#);

        let source = load(&path).unwrap();
        assert_eq!(source.data["id"], "doc:meta:roles");
    }

    #[test]
    fn unknown_extension_falls_back_to_json() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "doc.txt", "{\"id\": \"doc:meta:roles\"}");

        let source = load(&path).unwrap();
        assert_eq!(source.data["id"], "doc:meta:roles");
    }

    #[test]
    fn missing_file_is_syntax_error() {
        let err = load(Path::new("/nonexistent/doc.yaml")).unwrap_err();
        assert!(matches!(err, ScsError::Syntax { .. }));
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn yaml_error_reports_line_and_column() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "bad.yaml", "id: doc:meta:roles\ntitle: [unclosed\n");

        match load(&path).unwrap_err() {
            ScsError::Syntax { line, column, .. } => {
                assert!(line.is_some());
                assert!(column.is_some());
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn json_error_reports_line_and_column() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "bad.json", "{\n  \"id\": \n}");

        match load(&path).unwrap_err() {
            ScsError::Syntax { line, column, .. } => {
                assert_eq!(line, Some(3));
                assert!(column.is_some());
            }
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn non_mapping_content_is_rejected() {
        let temp = TempDir::new().unwrap();
        let yaml = write(&temp, "list.yaml", "- a\n- b\n");
        let json = write(&temp, "list.json", "[1, 2]");

        assert!(load(&yaml)
            .unwrap_err()
            .to_string()
            .contains("must be an object"));
        assert!(load(&json)
            .unwrap_err()
            .to_string()
            .contains("must be an object"));
    }

    #[test]
    fn empty_yaml_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = write(&temp, "empty.yaml", "");
        assert!(load(&path).is_err());
    }

    #[test]
    fn load_schema_requires_existing_json() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            load_schema(&temp.path().join("missing.json")),
            Err(ScsError::SchemaNotFound { .. })
        ));

        let bad = write(&temp, "bad.json", "{ not json");
        assert!(matches!(
            load_schema(&bad),
            Err(ScsError::SchemaInvalid { .. })
        ));

        let good = write(&temp, "good.json", r#"{"type": "object"}"#);
        assert_eq!(load_schema(&good).unwrap()["type"], "object");
    }
}
