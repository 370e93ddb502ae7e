//! Embeddable core library for lockaudit.
//!
//! Provides a clap-free, I/O-abstracted entry point for the audit command.
//!
//! # Port traits
//!
//! Every collaborator outside the core is a port in [`ports`]:
//! - [`Verifier`](ports::Verifier): check the lockfile against the manifest
//! - [`Generator`](ports::Generator): build the audit request
//! - [`ReportClient`](ports::ReportClient): submit the request for a full report
//! - [`Printer`](ports::Printer): display the report
//! - [`Updater`](ports::Updater) / [`Installer`](ports::Installer): change the dependency tree
//!
//! The [`adapters`] module provides default implementations backed by the filesystem, the
//! registry, stdout, and the package-manager executable.
//!
//! # Entry point
//!
//! [`run_audit`](pipeline::run_audit) resolves inputs, gates on lock consistency, fetches the
//! report, and then either presents it or plans and executes fixes.

pub mod adapters;
pub mod error;
pub mod executor;
pub mod pipeline;
pub mod ports;
pub mod presenter;
pub mod settings;

pub use error::{AuditError, SubmitError};
pub use pipeline::{AuditOutcome, AuditRun, Ports, run_audit};
pub use settings::{AuditMode, AuditSettings, CommandSpec, OutputFormat};

// Re-exported so embedders don't need the inner crates directly.
pub use lockaudit_domain::VerifyOutcome;
pub use lockaudit_inputs::{InputError, InputWarning};
