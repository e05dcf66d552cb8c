//! Integration tests for the `scs` binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

mod common;

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use common::{schema_dir, Project};
use predicates::prelude::*;

fn scs() -> Command {
    let mut cmd = Command::new(cargo_bin("scs"));
    cmd.env_remove("SCS_SCHEMA_DIR").env_remove("RUST_LOG");
    cmd
}

fn validate(project: &Project) -> Command {
    let mut cmd = scs();
    cmd.current_dir(project.path())
        .arg("validate")
        .arg("--no-color")
        .arg("--schema-dir")
        .arg(schema_dir());
    cmd
}

const STUB_RULES: &str = r#"enabled: true
severity: warning
stub_detection:
  enabled: true
  stub_threshold: 2
  indicators:
    - check: short_description
      threshold: 200
      message: "Description is short"
    - check: no_relationships
      message: "No relationships"
compliance_validation:
  enabled: true
  checks:
    - check: standards_bundle_present
      severity: error
"#;

#[test]
fn cli_shows_help() {
    scs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"));
}

#[test]
fn cli_shows_version() {
    scs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn healthcare_project_is_valid() {
    let project = Project::healthcare();

    validate(&project)
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("SCS Validator v"))
        .stdout(predicate::str::contains("✓ Bundle schema validation passed"))
        .stdout(predicate::str::contains(
            "✓ Semantic validation passed (3 documents)",
        ))
        .stdout(predicate::str::contains(
            "✓ Relationships validation passed (3 documents)",
        ))
        .stdout(predicate::str::contains("Completeness").not())
        .stdout(predicate::str::contains("Status: ✓ VALID"));
}

#[test]
fn no_input_exits_3() {
    let project = Project::new();
    validate(&project)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No files or bundle specified"));
}

#[test]
fn missing_schema_dir_exits_4() {
    let project = Project::healthcare();
    scs()
        .current_dir(project.path())
        .args(["validate", "--schema-dir", "no-such-dir", "--bundle"])
        .arg(project.project_bundle())
        .assert()
        .code(4)
        .stderr(predicate::str::contains("Schema directory not found"))
        .stderr(predicate::str::contains("→ Use --schema-dir to specify the location"));
}

#[test]
fn missing_rules_dir_exits_5() {
    let project = Project::healthcare();
    validate(&project)
        .args(["--rules-dir", "no-such-rules", "--bundle"])
        .arg(project.project_bundle())
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Rules directory not found"));
}

#[test]
fn warnings_fail_only_in_strict_mode() {
    let project = Project::healthcare();
    let roles = project.join("context/meta/roles.yaml");
    let content = std::fs::read_to_string(&roles).unwrap();
    std::fs::write(
        &roles,
        content.replace("  rationale: Captures the agreed approach\n", ""),
    )
    .unwrap();

    validate(&project)
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("rationale"))
        .stdout(predicate::str::contains("Status: ✓ VALID"));

    validate(&project)
        .arg("--strict")
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(2)
        .stdout(predicate::str::contains(
            "Status: ⚠ VALID WITH WARNINGS (strict mode)",
        ));
}

#[test]
fn xor_violation_fails() {
    let project = Project::healthcare();
    let bundle = project.write(
        "bundles/mixed.yaml",
        "id: bundle:mixed\ntype: domain\nversion: 1.0.0\nimports:\n  - bundle:meta\nscds:\n  - doc:meta:roles\n",
    );

    validate(&project)
        .arg("--bundle")
        .arg(bundle)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ Bundle validation failed"))
        .stdout(predicate::str::contains("(imports: 1, scds: 1)"))
        .stdout(predicate::str::contains("Status: ✗ FAILED"));
}

#[test]
fn dependency_cycle_is_a_warning() {
    let project = Project::new();
    project.doc("project", "a", "Service A", None, &[("depends-on", "doc:project:b")]);
    project.doc("project", "b", "Service B", None, &[("depends-on", "doc:project:a")]);
    let bundle = project.write(
        "bundles/cycle.yaml",
        "id: bundle:cycle\ntype: domain\nversion: 1.0.0\nscds:\n  - doc:project:a\n  - doc:project:b\n",
    );

    validate(&project)
        .arg("--bundle")
        .arg(bundle)
        .assert()
        .code(0)
        .stdout(predicate::str::contains(
            "Circular dependency detected: doc:project:a → doc:project:b → doc:project:a",
        ));
}

#[test]
fn project_completeness_rules_are_picked_up() {
    let project = Project::healthcare();
    project.write(".scs/completeness-rules.yaml", STUB_RULES);

    // roles has no relationships and a description under 200 characters
    validate(&project)
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("✓ Completeness validation passed"))
        .stdout(predicate::str::contains(
            "doc:meta:roles appears to be a stub: Description is short; No relationships",
        ))
        .stdout(predicate::str::contains("authn-authz appears to be a stub").not());
}

#[test]
fn draft_documents_are_not_stubs() {
    let project = Project::healthcare();
    project.write(".scs/completeness-rules.yaml", STUB_RULES);
    for name in ["meta/roles", "standards/encryption-policy"] {
        let path = project.join(&format!("context/{}.yaml", name));
        let content = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, content.replace("version: 1.0.0", "version: DRAFT")).unwrap();
    }

    validate(&project)
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("appears to be a stub").not());
}

#[test]
fn skip_completeness_omits_the_level() {
    let project = Project::healthcare();
    project.write(".scs/completeness-rules.yaml", STUB_RULES);

    validate(&project)
        .arg("--skip-completeness")
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("Completeness").not());
}

#[test]
fn compliance_failure_is_an_error() {
    let project = Project::healthcare();
    let rules = project.write("custom-rules.yaml", STUB_RULES);
    project.write(
        "bundles/project-bundle.yaml",
        "id: bundle:healthcare-app\ntype: project\nversion: 1.0.0\nimports:\n  - bundle:meta:1.0.0\n  - bundle:security:1.0.0\n",
    );

    validate(&project)
        .arg("--completeness-rules")
        .arg(rules)
        .arg("--bundle")
        .arg(project.project_bundle())
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "Project does not import the standards bundle",
        ));
}

#[test]
fn unresolved_targets_follow_strict_references() {
    let project = Project::new();
    project.doc(
        "project",
        "a",
        "Service A",
        None,
        &[("references", "doc:project:elsewhere")],
    );
    let bundle = project.write(
        "bundles/domain.yaml",
        "id: bundle:domain\ntype: domain\nversion: 1.0.0\nscds:\n  - doc:project:a\n",
    );

    validate(&project)
        .arg("--bundle")
        .arg(&bundle)
        .assert()
        .code(0)
        .stdout(predicate::str::contains("May exist in another bundle"));

    validate(&project)
        .arg("--strict-references")
        .arg("--bundle")
        .arg(&bundle)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ Relationships validation failed"));
}

#[test]
fn validates_individual_files() {
    let project = Project::healthcare();

    validate(&project)
        .arg(project.join("context/meta/roles.yaml"))
        .arg(project.join("context/project/authn-authz.yaml"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("✓ Syntax validation passed (2 files)"))
        .stdout(predicate::str::contains("✓ Schema validation passed (2 files)"))
        .stdout(predicate::str::contains("✓ Semantic validation passed (2 files)"));
}

#[test]
fn syntax_errors_are_reported_with_location() {
    let project = Project::new();
    let bad = project.write("bad.yaml", "id: doc:meta:bad\ntitle: [unclosed\n");

    validate(&project)
        .arg(bad)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("✗ Syntax validation failed (0 files)"))
        .stdout(predicate::str::contains("bad.yaml:"))
        .stdout(predicate::str::contains("Invalid YAML syntax"));
}

#[test]
fn json_output_is_machine_readable() {
    let project = Project::healthcare();

    let output = validate(&project)
        .args(["--output", "json", "--verbose", "--bundle"])
        .arg(project.project_bundle())
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(0));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["strict_mode"], false);
    assert_eq!(report["summary"]["status"], "valid");
    assert_eq!(report["validation_levels"]["bundle"]["bundle_type"], "project");
    assert_eq!(report["validation_levels"]["relationships"]["relationships"], 1);

    // verbose notes go to stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loaded security: 1 documents"));
}

#[test]
fn generates_completions() {
    scs()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scs"));
}
