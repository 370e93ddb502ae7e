use crate::files;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which lockfile candidate a document came from.
///
/// Ordering is priority order: `Shrinkwrap` wins over `PackageLock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LockfileKind {
    Shrinkwrap,
    PackageLock,
}

impl LockfileKind {
    pub fn file_name(self) -> &'static str {
        match self {
            LockfileKind::Shrinkwrap => files::SHRINKWRAP,
            LockfileKind::PackageLock => files::PACKAGE_LOCK,
        }
    }
}

impl fmt::Display for LockfileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// A resolved dependency tree (`npm-shrinkwrap.json` or `package-lock.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockfile_version: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires: Option<bool>,

    #[serde(default)]
    pub dependencies: BTreeMap<String, LockedDependency>,

    /// Flat `node_modules/...` table written by newer lockfile versions.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub packages: BTreeMap<String, PackageEntry>,
}

impl LockfileDocument {
    /// Version locked for a top-level dependency, from either table.
    pub fn locked_version(&self, name: &str) -> Option<&str> {
        if let Some(dep) = self.dependencies.get(name) {
            return Some(dep.version.as_str());
        }
        self.packages
            .get(&format!("node_modules/{name}"))
            .and_then(|p| p.version.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub dev: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LockedDependency {
    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub integrity: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub dev: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub bundled: bool,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub requires: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub dependencies: BTreeMap<String, LockedDependency>,
}

fn is_false(v: &bool) -> bool {
    !*v
}
