use lockaudit_types::audit::{ActionKind, AuditResult, RemediationAction, Severity, SeverityCounts};
use lockaudit_types::lockfile::{LockfileDocument, LockfileKind};
use lockaudit_types::manifest::ManifestDocument;
use lockaudit_types::plan::RemediationPlan;
use pretty_assertions::assert_eq;

#[test]
fn manifest_defaults_missing_dependency_tables() {
    let manifest: ManifestDocument =
        serde_json::from_str(r#"{ "name": "app", "version": "1.0.0" }"#).expect("parse");
    assert_eq!(manifest.name.as_deref(), Some("app"));
    assert!(manifest.dependencies.is_empty());
    assert!(manifest.dev_dependencies.is_empty());
}

#[test]
fn manifest_reads_camel_case_dev_dependencies() {
    let manifest: ManifestDocument = serde_json::from_str(
        r#"{ "dependencies": { "a": "^1.0.0" }, "devDependencies": { "b": "^2.0.0" }, "scripts": {} }"#,
    )
    .expect("parse");
    assert_eq!(manifest.dependencies.get("a").map(String::as_str), Some("^1.0.0"));
    assert_eq!(manifest.dev_dependencies.get("b").map(String::as_str), Some("^2.0.0"));
}

#[test]
fn lockfile_tolerates_unknown_fields_and_nesting() {
    let lock: LockfileDocument = serde_json::from_str(
        r#"{
            "name": "app",
            "lockfileVersion": 1,
            "requires": true,
            "packages": {},
            "dependencies": {
                "a": {
                    "version": "1.1.0",
                    "integrity": "sha512-abc",
                    "requires": { "b": "^2.0.0" },
                    "dependencies": { "b": { "version": "2.0.1", "dev": true } }
                }
            }
        }"#,
    )
    .expect("parse");
    assert_eq!(lock.lockfile_version, Some(1));
    let a = lock.dependencies.get("a").expect("a");
    assert_eq!(a.version, "1.1.0");
    assert!(a.dependencies.get("b").expect("nested b").dev);
}

#[test]
fn lockfile_kind_display_uses_file_name() {
    assert_eq!(LockfileKind::Shrinkwrap.to_string(), "npm-shrinkwrap.json");
    assert_eq!(LockfileKind::PackageLock.to_string(), "package-lock.json");
    assert!(LockfileKind::Shrinkwrap < LockfileKind::PackageLock);
}

#[test]
fn unknown_action_kind_deserializes_as_unrecognized() {
    let action: RemediationAction =
        serde_json::from_str(r#"{ "module": "x", "target": "1.0.0", "action": "uninstall" }"#)
            .expect("parse");
    assert_eq!(action.action, ActionKind::Unrecognized);
    assert!(!action.is_major);
    assert_eq!(action.depth, 0);
}

#[test]
fn review_action_without_target_deserializes() {
    let action: RemediationAction = serde_json::from_str(
        r#"{ "module": "x", "action": "review", "resolves": [{ "id": 7, "path": "a>x" }] }"#,
    )
    .expect("parse");
    assert_eq!(action.action, ActionKind::Review);
    assert_eq!(action.target, "");
    assert_eq!(action.resolves[0].id, 7);
}

#[test]
fn audit_result_reads_full_report_shape() {
    let result: AuditResult = serde_json::from_str(
        r#"{
            "actions": [
                { "action": "update", "module": "a", "target": "1.2.0", "depth": 3, "isMajor": false,
                  "resolves": [{ "id": 118, "path": "a", "dev": false, "optional": false, "bundled": false }] }
            ],
            "advisories": {
                "118": { "id": 118, "title": "Prototype Pollution", "module_name": "a",
                         "severity": "high", "vulnerable_versions": "<1.2.0", "patched_versions": ">=1.2.0" }
            },
            "muted": [],
            "metadata": {
                "vulnerabilities": { "info": 4, "low": 0, "moderate": 1, "high": 1, "critical": 0 },
                "dependencies": 10, "devDependencies": 2, "optionalDependencies": 0, "totalDependencies": 12
            }
        }"#,
    )
    .expect("parse");
    assert_eq!(result.actions[0].depth, 3);
    assert_eq!(result.advisories["118"].severity, Severity::High);
    assert_eq!(result.metadata.dev_dependencies, 2);
    assert_eq!(result.metadata.vulnerabilities.total(), 2);
}

#[test]
fn severity_counts_exclude_info_by_default() {
    let counts = SeverityCounts {
        info: 9,
        low: 1,
        moderate: 2,
        high: 3,
        critical: 4,
    };
    assert_eq!(counts.total(), 10);
    assert_eq!(counts.count_at_or_above(Severity::Info), 19);
    assert_eq!(counts.count_at_or_above(Severity::High), 7);
    assert_eq!(counts.count_at_or_above(Severity::Critical), 4);
}

#[test]
fn severity_parses_case_insensitively() {
    assert_eq!("HIGH".parse::<Severity>(), Ok(Severity::High));
    assert!("severe".parse::<Severity>().is_err());
}

#[test]
fn plan_install_specs_put_majors_first() {
    let plan = RemediationPlan {
        install: vec!["c@3.0.0".to_string()],
        major: vec!["d@5.0.0".to_string()],
        ..RemediationPlan::default()
    };
    assert_eq!(plan.install_specs(), vec!["d@5.0.0", "c@3.0.0"]);
    assert!(!plan.is_noop());
    assert!(RemediationPlan::default().is_noop());
}

#[test]
fn plan_serializes_snake_case() {
    let plan = RemediationPlan {
        max_depth: 2,
        ..RemediationPlan::default()
    };
    let value = serde_json::to_value(&plan).expect("serialize");
    assert_eq!(value["max_depth"], serde_json::json!(2));
}

#[test]
fn locked_version_falls_back_to_packages_table() {
    let lock: LockfileDocument = serde_json::from_str(
        r#"{
            "lockfileVersion": 3,
            "packages": {
                "": { "name": "app" },
                "node_modules/left-pad": { "version": "1.3.0" },
                "node_modules/@scope/pkg": { "version": "0.2.0", "dev": true }
            }
        }"#,
    )
    .expect("parse");
    assert_eq!(lock.locked_version("left-pad"), Some("1.3.0"));
    assert_eq!(lock.locked_version("@scope/pkg"), Some("0.2.0"));
    assert_eq!(lock.locked_version("missing"), None);
}
