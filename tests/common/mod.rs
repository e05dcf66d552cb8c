//! Shared fixtures for the integration tests.
//!
//! Builds a project tree in a temp dir:
//!
//! ```text
//! bundles/project-bundle.yaml   imports meta, standards, security
//! bundles/meta.yaml
//! bundles/standards.yaml
//! bundles/domains/security.yaml
//! context/<tier>/<name>.yaml
//! ```

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The schema directory shipped with the crate.
pub fn schema_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("schema")
}

pub struct Project {
    pub dir: TempDir,
}

impl Project {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// The healthcare example: a project bundle whose security domain
    /// lists one project document depending on a standards document.
    pub fn healthcare() -> Self {
        let project = Self::new();
        project.write(
            "bundles/project-bundle.yaml",
            r#"id: bundle:healthcare-app
type: project
version: 1.0.0
title: Healthcare app
imports:
  - bundle:meta:1.0
  - bundle:standards:1.0
  - bundle:security:1.0
"#,
        );
        project.write(
            "bundles/meta.yaml",
            "id: bundle:meta\ntype: meta\nversion: 1.0.0\nscds:\n  - doc:meta:roles\n",
        );
        project.write(
            "bundles/standards.yaml",
            "id: bundle:standards\ntype: standards\nversion: 1.0.0\nscds:\n  - doc:standards:encryption-policy\n",
        );
        project.write(
            "bundles/domains/security.yaml",
            "id: bundle:security\ntype: domain\nversion: 1.0.0\nscds:\n  - doc:project:authn-authz\n",
        );
        project.doc("meta", "roles", "Roles", None, &[]);
        project.doc("standards", "encryption-policy", "Encryption policy", None, &[]);
        project.doc(
            "project",
            "authn-authz",
            "Authentication and authorization",
            Some("security"),
            &[("depends-on", "doc:standards:encryption-policy")],
        );
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    /// Write a complete, valid document at `context/<tier>/<name>.yaml`.
    pub fn doc(
        &self,
        tier: &str,
        name: &str,
        title: &str,
        domain: Option<&str>,
        relationships: &[(&str, &str)],
    ) -> PathBuf {
        let mut yaml = format!(
            "id: doc:{tier}:{name}\n\
             type: {tier}\n\
             version: 1.0.0\n\
             title: {title}\n\
             description: {title} for the healthcare application, agreed by the team\n\
             provenance:\n  \
               created_by: platform-team\n  \
               created_at: \"2024-01-15T10:00:00Z\"\n  \
               rationale: Captures the agreed approach\n\
             content:\n  \
               summary: {title}\n  \
               owner: platform-team\n"
        );
        if let Some(domain) = domain {
            yaml.push_str(&format!("domain: {}\n", domain));
        }
        if !relationships.is_empty() {
            yaml.push_str("relationships:\n");
            for (rel_type, target) in relationships {
                yaml.push_str(&format!("  - type: {}\n    target: {}\n", rel_type, target));
            }
        }
        self.write(&format!("context/{}/{}.yaml", tier, name), &yaml)
    }

    pub fn project_bundle(&self) -> PathBuf {
        self.join("bundles/project-bundle.yaml")
    }
}
