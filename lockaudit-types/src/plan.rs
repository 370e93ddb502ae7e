use crate::audit::RemediationAction;
use serde::{Deserialize, Serialize};

/// Remediation actions sorted into the buckets the fix run executes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemediationPlan {
    /// `name@version` specs installed as non-breaking fixes.
    #[serde(default)]
    pub install: Vec<String>,

    /// Package names handed to the updater.
    #[serde(default)]
    pub update: Vec<String>,

    /// `name@version` specs that cross a major version.
    #[serde(default)]
    pub major: Vec<String>,

    /// Actions that need a human.
    #[serde(default)]
    pub review: Vec<RemediationAction>,

    /// Deepest update action; the updater's traversal depth.
    #[serde(default)]
    pub max_depth: u32,
}

impl RemediationPlan {
    /// True when neither phase of a fix run has anything to do.
    pub fn is_noop(&self) -> bool {
        self.update.is_empty() && self.major.is_empty() && self.install.is_empty()
    }

    /// Installer arguments: major specs first, then regular installs.
    pub fn install_specs(&self) -> Vec<String> {
        self.major
            .iter()
            .chain(self.install.iter())
            .cloned()
            .collect()
    }
}
