use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Declared dependencies keyed by package name, valued by version range.
pub type DependencySet = BTreeMap<String, String>;

/// The project descriptor (`package.json`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub dependencies: DependencySet,

    #[serde(default)]
    pub dev_dependencies: DependencySet,
}
