//! The audit pipeline, extracted from the CLI.
//!
//! Stages run strictly in order and every failure aborts the rest:
//! resolve inputs, gate on lock consistency, build and submit the request, then either present
//! the report or plan and execute fixes. All external effects go through the port traits.

use crate::error::{AuditError, SubmitError};
use crate::executor::{ExecuteOptions, ExecutionReport, execute};
use crate::ports::{Generator, Installer, Printer, ReportClient, Updater, Verifier};
use crate::presenter::present;
use crate::settings::{AuditMode, AuditSettings};
use lockaudit_domain::plan;
use lockaudit_inputs::{InputWarning, load_inputs};
use lockaudit_types::audit::AuditResult;
use lockaudit_types::lockfile::LockfileKind;
use lockaudit_types::plan::RemediationPlan;
use tracing::{debug, info};

/// The collaborators a run needs.
#[derive(Clone, Copy)]
pub struct Ports<'a> {
    pub verifier: &'a dyn Verifier,
    pub generator: &'a dyn Generator,
    pub client: &'a dyn ReportClient,
    pub printer: &'a dyn Printer,
    pub updater: &'a dyn Updater,
    pub installer: &'a dyn Installer,
}

#[derive(Debug)]
pub enum AuditOutcome {
    Report {
        result: AuditResult,
        exit_code: u8,
    },
    Fix {
        result: AuditResult,
        plan: RemediationPlan,
        execution: ExecutionReport,
    },
}

impl AuditOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            AuditOutcome::Report { exit_code, .. } => *exit_code,
            AuditOutcome::Fix { .. } => 0,
        }
    }
}

/// Outcome of `run_audit`.
#[derive(Debug)]
pub struct AuditRun {
    pub lockfile: LockfileKind,
    pub warnings: Vec<InputWarning>,
    pub outcome: AuditOutcome,
}

/// Run one audit against `settings.project_root`.
pub async fn run_audit(settings: &AuditSettings, ports: Ports<'_>) -> Result<AuditRun, AuditError> {
    if settings.global {
        return Err(AuditError::GlobalModeUnsupported);
    }

    let inputs = load_inputs(&settings.project_root).await?;
    debug!(
        lockfile = %inputs.lockfile_kind,
        dependencies = inputs.dependencies.len(),
        "inputs resolved"
    );

    let verdict = ports.verifier.verify(&settings.project_root).await?;
    if !verdict.ok {
        return Err(AuditError::LockVerify {
            lockfile: inputs.lockfile_kind,
            errors: verdict.errors,
        });
    }

    let request = ports
        .generator
        .generate(&inputs.lockfile, &inputs.dependencies);

    let result = ports
        .client
        .submit_for_full_report(&request)
        .await
        .map_err(|e| map_submit_error(&settings.registry, e))?;
    info!(
        advisories = result.advisories.len(),
        actions = result.actions.len(),
        "audit report received"
    );

    let outcome = match settings.mode {
        AuditMode::Report => {
            let exit_code = present(&result, ports.printer, settings.audit_level)?;
            AuditOutcome::Report { result, exit_code }
        }
        AuditMode::Fix => {
            let plan = plan(&result.actions);
            let execution = execute(
                &plan,
                ports.updater,
                ports.installer,
                ExecuteOptions {
                    dry_run: settings.dry_run,
                },
            )
            .await?;
            AuditOutcome::Fix {
                result,
                plan,
                execution,
            }
        }
    };

    Ok(AuditRun {
        lockfile: inputs.lockfile_kind,
        warnings: inputs.warnings,
        outcome,
    })
}

/// A registry that answers 404 or a server error does not implement the audit endpoint.
pub fn map_submit_error(registry: &str, err: SubmitError) -> AuditError {
    match err.status() {
        Some(status) if status == 404 || status >= 500 => AuditError::RegistryUnsupported {
            registry: registry.to_string(),
            source: err,
        },
        _ => AuditError::Submit(err),
    }
}
