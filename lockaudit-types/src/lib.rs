//! Shared DTOs for the lockaudit workspace.
//!
//! # Design constraints
//! - Manifest, lockfile, and report types mirror the JSON documents the package manager and the
//!   registry exchange; unknown fields are tolerated, missing optional fields default.
//! - The plan type is produced locally and serialized for `--json` output only.

pub mod audit;
pub mod lockfile;
pub mod manifest;
pub mod plan;

/// Well-known file names relative to the project root.
pub mod files {
    pub const MANIFEST: &str = "package.json";
    pub const SHRINKWRAP: &str = "npm-shrinkwrap.json";
    pub const PACKAGE_LOCK: &str = "package-lock.json";
}
