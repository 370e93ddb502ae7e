use crate::lockfile::LockedDependency;
use crate::manifest::DependencySet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body submitted to the registry's bulk audit endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub install: Vec<String>,

    #[serde(default)]
    pub remove: Vec<String>,

    #[serde(default)]
    pub metadata: RequestMetadata,

    #[serde(default)]
    pub requires: DependencySet,

    #[serde(default)]
    pub dependencies: BTreeMap<String, LockedDependency>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_version: Option<String>,

    pub platform: String,
}

/// Full report returned by the registry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditResult {
    #[serde(default)]
    pub actions: Vec<RemediationAction>,

    #[serde(default)]
    pub advisories: BTreeMap<String, Advisory>,

    #[serde(default)]
    pub metadata: AuditMetadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditMetadata {
    #[serde(default)]
    pub vulnerabilities: SeverityCounts,

    #[serde(default)]
    pub dependencies: u64,

    #[serde(default)]
    pub dev_dependencies: u64,

    #[serde(default)]
    pub optional_dependencies: u64,

    #[serde(default)]
    pub total_dependencies: u64,
}

/// Vulnerability counts per severity bucket.
///
/// `info` is carried through from the registry but never contributes to the
/// default vulnerability count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub info: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub moderate: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub critical: u64,
}

impl SeverityCounts {
    /// `low + moderate + high + critical`.
    pub fn total(&self) -> u64 {
        self.count_at_or_above(Severity::Low)
    }

    pub fn count_at_or_above(&self, level: Severity) -> u64 {
        [
            (Severity::Info, self.info),
            (Severity::Low, self.low),
            (Severity::Moderate, self.moderate),
            (Severity::High, self.high),
            (Severity::Critical, self.critical),
        ]
        .into_iter()
        .filter(|(severity, _)| *severity >= level)
        .map(|(_, n)| n)
        .sum()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "low" => Ok(Severity::Low),
            "moderate" => Ok(Severity::Moderate),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(format!(
                "unknown severity '{other}' (expected info, low, moderate, high, or critical)"
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    pub id: u64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub module_name: String,

    #[serde(default)]
    pub severity: Severity,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vulnerable_versions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patched_versions: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
}

/// A single suggested fix from the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemediationAction {
    pub module: String,

    /// Review actions carry no target; it deserializes empty.
    #[serde(default)]
    pub target: String,

    pub action: ActionKind,

    #[serde(default)]
    pub is_major: bool,

    #[serde(default)]
    pub depth: u32,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resolves: Vec<Resolution>,
}

impl RemediationAction {
    /// `module@target`, the form handed to the installer.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.module, self.target)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Install,
    Update,
    Review,
    /// Any action name this version does not know how to execute.
    #[default]
    #[serde(other)]
    Unrecognized,
}

/// Advisory/path pair an action resolves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub id: u64,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub dev: bool,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub bundled: bool,
}
