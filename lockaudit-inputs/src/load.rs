use camino::{Utf8Path, Utf8PathBuf};
use lockaudit_types::files;
use lockaudit_types::lockfile::{LockfileDocument, LockfileKind};
use lockaudit_types::manifest::{DependencySet, ManifestDocument};
use serde::de::DeserializeOwned;
use std::fmt;
use std::io::ErrorKind;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to parse {path}: {message}")]
    Parse { path: Utf8PathBuf, message: String },

    #[error("no {} found at {path}", files::MANIFEST)]
    NoManifest { path: Utf8PathBuf },

    #[error(
        "no lockfile found in {root}; audit requires a {} or {}",
        files::SHRINKWRAP,
        files::PACKAGE_LOCK
    )]
    NoLockfile { root: Utf8PathBuf },

    #[error("read {path}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Non-fatal conditions noticed while resolving inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputWarning {
    LockfileConflict {
        selected: LockfileKind,
        ignored: LockfileKind,
    },
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputWarning::LockfileConflict { selected, ignored } => write!(
                f,
                "both {selected} and {ignored} exist; auditing {selected}"
            ),
        }
    }
}

/// Raw text of the three input files; `None` means the file does not exist.
#[derive(Debug, Clone, Default)]
pub struct RawInputs {
    pub shrinkwrap: Option<String>,
    pub package_lock: Option<String>,
    pub manifest: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub manifest: ManifestDocument,
    pub lockfile: LockfileDocument,
    pub lockfile_kind: LockfileKind,
    pub dependencies: DependencySet,
    pub warnings: Vec<InputWarning>,
}

/// Read and resolve the inputs under `root`.
pub async fn load_inputs(root: &Utf8Path) -> Result<ResolvedInputs, InputError> {
    let raw = read_inputs(root).await?;
    resolve_inputs(root, raw)
}

/// Read all three candidate files concurrently and wait for every read to finish.
pub async fn read_inputs(root: &Utf8Path) -> Result<RawInputs, InputError> {
    let (shrinkwrap, package_lock, manifest) = tokio::join!(
        read_optional(root.join(files::SHRINKWRAP)),
        read_optional(root.join(files::PACKAGE_LOCK)),
        read_optional(root.join(files::MANIFEST)),
    );

    Ok(RawInputs {
        shrinkwrap: shrinkwrap?,
        package_lock: package_lock?,
        manifest: manifest?,
    })
}

async fn read_optional(path: Utf8PathBuf) -> Result<Option<String>, InputError> {
    match tokio::fs::read_to_string(&path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path, "input file absent");
            Ok(None)
        }
        Err(source) => Err(InputError::Io { path, source }),
    }
}

/// Apply the presence and priority rules to already-read inputs.
pub fn resolve_inputs(root: &Utf8Path, raw: RawInputs) -> Result<ResolvedInputs, InputError> {
    let manifest_path = root.join(files::MANIFEST);
    let Some(manifest_text) = raw.manifest else {
        return Err(InputError::NoManifest {
            path: manifest_path,
        });
    };
    let manifest: ManifestDocument = parse_document(&manifest_path, &manifest_text)?;

    let shrinkwrap = raw
        .shrinkwrap
        .map(|text| parse_lockfile(root, LockfileKind::Shrinkwrap, &text))
        .transpose()?;
    let package_lock = raw
        .package_lock
        .map(|text| parse_lockfile(root, LockfileKind::PackageLock, &text))
        .transpose()?;

    let mut warnings = Vec::new();
    let (lockfile_kind, lockfile) = match (shrinkwrap, package_lock) {
        (Some(primary), Some(_)) => {
            let warning = InputWarning::LockfileConflict {
                selected: LockfileKind::Shrinkwrap,
                ignored: LockfileKind::PackageLock,
            };
            warn!("{warning}");
            warnings.push(warning);
            (LockfileKind::Shrinkwrap, primary)
        }
        (Some(primary), None) => (LockfileKind::Shrinkwrap, primary),
        (None, Some(secondary)) => (LockfileKind::PackageLock, secondary),
        (None, None) => {
            return Err(InputError::NoLockfile {
                root: root.to_path_buf(),
            });
        }
    };

    debug!(lockfile = %lockfile_kind, "selected lockfile");
    let dependencies = merge_dependencies(&manifest);

    Ok(ResolvedInputs {
        manifest,
        lockfile,
        lockfile_kind,
        dependencies,
        warnings,
    })
}

/// `dependencies` overlaid with `devDependencies`; on a name collision the dev entry wins.
pub fn merge_dependencies(manifest: &ManifestDocument) -> DependencySet {
    let mut merged = manifest.dependencies.clone();
    for (name, range) in &manifest.dev_dependencies {
        merged.insert(name.clone(), range.clone());
    }
    merged
}

fn parse_lockfile(
    root: &Utf8Path,
    kind: LockfileKind,
    text: &str,
) -> Result<LockfileDocument, InputError> {
    parse_document(&root.join(kind.file_name()), text)
}

fn parse_document<T: DeserializeOwned>(path: &Utf8Path, text: &str) -> Result<T, InputError> {
    serde_json::from_str(text).map_err(|e| InputError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const MANIFEST: &str = r#"{ "name": "app", "dependencies": { "a": "^1.0.0" } }"#;
    const SHRINKWRAP: &str = r#"{ "name": "from-shrinkwrap", "dependencies": {} }"#;
    const PACKAGE_LOCK: &str = r#"{ "name": "from-package-lock", "dependencies": {} }"#;

    fn raw(shrinkwrap: bool, package_lock: bool, manifest: bool) -> RawInputs {
        RawInputs {
            shrinkwrap: shrinkwrap.then(|| SHRINKWRAP.to_string()),
            package_lock: package_lock.then(|| PACKAGE_LOCK.to_string()),
            manifest: manifest.then(|| MANIFEST.to_string()),
        }
    }

    #[test]
    fn presence_matrix() {
        let root = Utf8Path::new("/project");
        for shrinkwrap in [false, true] {
            for package_lock in [false, true] {
                for manifest in [false, true] {
                    let result = resolve_inputs(root, raw(shrinkwrap, package_lock, manifest));
                    match (manifest, shrinkwrap, package_lock) {
                        (false, _, _) => {
                            assert!(matches!(result, Err(InputError::NoManifest { .. })))
                        }
                        (true, false, false) => {
                            assert!(matches!(result, Err(InputError::NoLockfile { .. })))
                        }
                        (true, true, true) => {
                            let inputs = result.expect("resolved");
                            assert_eq!(inputs.lockfile_kind, LockfileKind::Shrinkwrap);
                            assert_eq!(inputs.lockfile.name.as_deref(), Some("from-shrinkwrap"));
                            assert_eq!(inputs.warnings.len(), 1);
                        }
                        (true, true, false) => {
                            let inputs = result.expect("resolved");
                            assert_eq!(inputs.lockfile_kind, LockfileKind::Shrinkwrap);
                            assert!(inputs.warnings.is_empty());
                        }
                        (true, false, true) => {
                            let inputs = result.expect("resolved");
                            assert_eq!(inputs.lockfile_kind, LockfileKind::PackageLock);
                            assert_eq!(inputs.lockfile.name.as_deref(), Some("from-package-lock"));
                            assert!(inputs.warnings.is_empty());
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn dev_dependencies_override_dependencies() {
        let manifest: ManifestDocument = serde_json::from_str(
            r#"{
                "dependencies": { "a": "^1.0.0", "shared": "^1.0.0" },
                "devDependencies": { "b": "^2.0.0", "shared": "^2.0.0" }
            }"#,
        )
        .expect("parse");

        let merged = merge_dependencies(&manifest);
        let entries: Vec<(&str, &str)> = merged
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            entries,
            vec![("a", "^1.0.0"), ("b", "^2.0.0"), ("shared", "^2.0.0")]
        );
    }

    #[test]
    fn malformed_manifest_reports_its_path() {
        let root = Utf8Path::new("/project");
        let err = resolve_inputs(
            root,
            RawInputs {
                manifest: Some("{ not json".to_string()),
                package_lock: Some(PACKAGE_LOCK.to_string()),
                shrinkwrap: None,
            },
        )
        .expect_err("parse error");
        match err {
            InputError::Parse { path, .. } => assert_eq!(path, root.join("package.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn malformed_secondary_lockfile_fails_even_when_primary_present() {
        let root = Utf8Path::new("/project");
        let err = resolve_inputs(
            root,
            RawInputs {
                manifest: Some(MANIFEST.to_string()),
                shrinkwrap: Some(SHRINKWRAP.to_string()),
                package_lock: Some("[".to_string()),
            },
        )
        .expect_err("parse error");
        match err {
            InputError::Parse { path, .. } => assert_eq!(path, root.join("package-lock.json")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_manifest_wins_over_malformed_lockfile() {
        let err = resolve_inputs(
            Utf8Path::new("/project"),
            RawInputs {
                manifest: None,
                shrinkwrap: Some("garbage".to_string()),
                package_lock: None,
            },
        )
        .expect_err("no manifest");
        assert!(matches!(err, InputError::NoManifest { .. }));
    }

    #[test]
    fn conflict_warning_names_both_files() {
        let warning = InputWarning::LockfileConflict {
            selected: LockfileKind::Shrinkwrap,
            ignored: LockfileKind::PackageLock,
        };
        assert_eq!(
            warning.to_string(),
            "both npm-shrinkwrap.json and package-lock.json exist; auditing npm-shrinkwrap.json"
        );
    }
}
