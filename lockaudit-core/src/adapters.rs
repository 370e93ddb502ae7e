//! Default port implementations backed by the filesystem, the registry, stdout, and the
//! package-manager executable.

use crate::error::SubmitError;
use crate::ports::{Generator, Installer, Printer, ReportClient, Updater, Verifier};
use crate::settings::{CommandSpec, OutputFormat};
use anyhow::Context;
use async_trait::async_trait;
use camino::{Utf8Path, Utf8PathBuf};
use lockaudit_domain::{VerifyOutcome, check_lock_consistency, generate_request};
use lockaudit_inputs::load_inputs;
use lockaudit_render::{render_json, render_report_text};
use lockaudit_types::audit::{AuditRequest, AuditResult, RequestMetadata};
use lockaudit_types::lockfile::LockfileDocument;
use lockaudit_types::manifest::DependencySet;
use std::io::Write;
use tokio::process::Command;
use tracing::{debug, info};

pub const AUDIT_ENDPOINT: &str = "-/npm/v1/security/audits";

/// Re-reads the project and checks the selected lockfile against the manifest.
#[derive(Debug, Clone, Default)]
pub struct LockfileVerifier;

#[async_trait]
impl Verifier for LockfileVerifier {
    async fn verify(&self, project_root: &Utf8Path) -> anyhow::Result<VerifyOutcome> {
        let inputs = load_inputs(project_root)
            .await
            .with_context(|| format!("load inputs from {project_root}"))?;
        let outcome = check_lock_consistency(&inputs.lockfile, &inputs.dependencies);
        debug!(
            lockfile = %inputs.lockfile_kind,
            errors = outcome.errors.len(),
            "lockfile verified"
        );
        Ok(outcome)
    }
}

/// Builds requests describing the running tool and platform.
#[derive(Debug, Clone)]
pub struct RegistryRequestGenerator {
    pub metadata: RequestMetadata,
}

impl Default for RegistryRequestGenerator {
    fn default() -> Self {
        Self {
            metadata: RequestMetadata {
                npm_version: None,
                node_version: None,
                platform: std::env::consts::OS.to_string(),
            },
        }
    }
}

impl Generator for RegistryRequestGenerator {
    fn generate(&self, lockfile: &LockfileDocument, dependencies: &DependencySet) -> AuditRequest {
        generate_request(lockfile, dependencies, self.metadata.clone())
    }
}

/// Posts audit requests to the registry's bulk audit endpoint.
#[derive(Debug, Clone)]
pub struct HttpReportClient {
    client: reqwest::Client,
    registry: String,
}

impl HttpReportClient {
    pub fn new(registry: impl Into<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("lockaudit/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("build HTTP client")?;
        Ok(Self {
            client,
            registry: registry.into(),
        })
    }

    pub fn endpoint(&self) -> String {
        audit_url(&self.registry)
    }
}

/// `{registry}/-/npm/v1/security/audits`, tolerating a trailing slash on the registry.
pub fn audit_url(registry: &str) -> String {
    format!("{}/{}", registry.trim_end_matches('/'), AUDIT_ENDPOINT)
}

#[async_trait]
impl ReportClient for HttpReportClient {
    async fn submit_for_full_report(
        &self,
        request: &AuditRequest,
    ) -> Result<AuditResult, SubmitError> {
        let url = self.endpoint();
        debug!(url = %url, "submitting audit request");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|source| SubmitError::Transport {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(url = %url, error = %e, "could not read error response body");
                    String::new()
                }
            };
            return Err(SubmitError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<AuditResult>()
            .await
            .map_err(|source| SubmitError::Decode { url, source })
    }
}

/// Writes the report to stdout as text or JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPrinter {
    pub format: OutputFormat,
}

impl StdoutPrinter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, result: &AuditResult) -> anyhow::Result<String> {
        match self.format {
            OutputFormat::Text => Ok(render_report_text(result)),
            OutputFormat::Json => render_json(result).context("serialize audit report"),
        }
    }
}

impl Printer for StdoutPrinter {
    fn print_full_report(&self, result: &AuditResult) -> anyhow::Result<()> {
        let text = self.render(result)?;
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(text.as_bytes())
            .and_then(|()| stdout.flush())
            .context("write report to stdout")
    }
}

/// Runs the configured update command in the project root.
#[derive(Debug, Clone)]
pub struct CommandUpdater {
    pub command: CommandSpec,
    pub project_root: Utf8PathBuf,
}

impl CommandUpdater {
    pub fn new(command: CommandSpec, project_root: Utf8PathBuf) -> Self {
        Self {
            command,
            project_root,
        }
    }
}

#[async_trait]
impl Updater for CommandUpdater {
    async fn update(&self, modules: &[String], depth: u32) -> anyhow::Result<()> {
        let mut extra = vec!["--depth".to_string(), depth.to_string()];
        extra.extend(modules.iter().cloned());
        run_command(&self.command, &extra, &self.project_root).await
    }
}

/// Runs the configured install command in the project root.
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    pub command: CommandSpec,
    pub project_root: Utf8PathBuf,
}

impl CommandInstaller {
    pub fn new(command: CommandSpec, project_root: Utf8PathBuf) -> Self {
        Self {
            command,
            project_root,
        }
    }
}

#[async_trait]
impl Installer for CommandInstaller {
    async fn install(&self, specs: &[String]) -> anyhow::Result<()> {
        run_command(&self.command, specs, &self.project_root).await
    }
}

async fn run_command(spec: &CommandSpec, extra: &[String], cwd: &Utf8Path) -> anyhow::Result<()> {
    let shown = spec.display_with(extra);
    info!(command = %shown, "running");

    let status = Command::new(&spec.program)
        .args(&spec.args)
        .args(extra)
        .current_dir(cwd)
        .status()
        .await
        .with_context(|| format!("spawn `{shown}`"))?;

    if !status.success() {
        anyhow::bail!("`{shown}` failed with {status}");
    }
    Ok(())
}
