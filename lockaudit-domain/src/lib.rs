//! Domain logic: turn an audit report into a deterministic remediation plan, build the audit
//! request from a lockfile, and check a lockfile against the manifest.
//!
//! This crate does no I/O. Reading files, talking to the registry, and running the package
//! manager belong to `lockaudit-core`'s ports.

mod consistency;
mod planner;
mod request;

pub use consistency::{VerifyOutcome, check_lock_consistency};
pub use planner::plan;
pub use request::generate_request;
