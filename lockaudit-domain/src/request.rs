use lockaudit_types::audit::{AuditRequest, RequestMetadata};
use lockaudit_types::lockfile::{LockedDependency, LockfileDocument, PackageEntry};
use lockaudit_types::manifest::DependencySet;
use std::collections::BTreeMap;

/// Build the bulk audit request for a lockfile tree and the declared dependencies.
///
/// Lockfiles that only carry the flat `packages` table are folded back into the nested
/// `dependencies` shape the audit endpoint expects.
pub fn generate_request(
    lockfile: &LockfileDocument,
    dependencies: &DependencySet,
    metadata: RequestMetadata,
) -> AuditRequest {
    let tree = if lockfile.dependencies.is_empty() && !lockfile.packages.is_empty() {
        fold_packages(&lockfile.packages)
    } else {
        lockfile.dependencies.clone()
    };

    AuditRequest {
        name: lockfile.name.clone(),
        version: lockfile.version.clone(),
        install: Vec::new(),
        remove: Vec::new(),
        metadata,
        requires: dependencies.clone(),
        dependencies: tree,
    }
}

fn fold_packages(packages: &BTreeMap<String, PackageEntry>) -> BTreeMap<String, LockedDependency> {
    let mut tree: BTreeMap<String, LockedDependency> = BTreeMap::new();

    // BTreeMap order visits a parent path before any path nested under it.
    for (path, entry) in packages {
        let Some(rest) = path.strip_prefix("node_modules/") else {
            continue;
        };
        let chain: Vec<&str> = rest.split("/node_modules/").collect();
        let Some((leaf, parents)) = chain.split_last() else {
            continue;
        };

        let mut level = &mut tree;
        for parent in parents {
            level = &mut level.entry((*parent).to_string()).or_default().dependencies;
        }
        let node = level.entry((*leaf).to_string()).or_default();
        node.version = entry.version.clone().unwrap_or_default();
        node.resolved = entry.resolved.clone();
        node.integrity = entry.integrity.clone();
        node.dev = entry.dev;
        node.optional = entry.optional;
    }

    tree
}
