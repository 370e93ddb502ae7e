//! Port traits abstracting every collaborator away from the pipeline.

use crate::error::SubmitError;
use async_trait::async_trait;
use camino::Utf8Path;
use lockaudit_domain::VerifyOutcome;
use lockaudit_types::audit::{AuditRequest, AuditResult};
use lockaudit_types::lockfile::LockfileDocument;
use lockaudit_types::manifest::DependencySet;

/// Lockfile consistency checker.
#[async_trait]
pub trait Verifier: Send + Sync {
    async fn verify(&self, project_root: &Utf8Path) -> anyhow::Result<VerifyOutcome>;
}

/// Builds the request body for the registry.
pub trait Generator: Send + Sync {
    fn generate(&self, lockfile: &LockfileDocument, dependencies: &DependencySet) -> AuditRequest;
}

/// Registry audit endpoint.
#[async_trait]
pub trait ReportClient: Send + Sync {
    async fn submit_for_full_report(
        &self,
        request: &AuditRequest,
    ) -> Result<AuditResult, SubmitError>;
}

/// Human- or machine-readable report output.
pub trait Printer: Send + Sync {
    fn print_full_report(&self, result: &AuditResult) -> anyhow::Result<()>;
}

/// Updates packages in place, descending at most `depth` levels.
#[async_trait]
pub trait Updater: Send + Sync {
    async fn update(&self, modules: &[String], depth: u32) -> anyhow::Result<()>;
}

/// Installs `name@version` specs.
#[async_trait]
pub trait Installer: Send + Sync {
    async fn install(&self, specs: &[String]) -> anyhow::Result<()>;
}
