//! Error types for the audit pipeline.
//!
//! Usage errors (exit code 2) are separated from everything else (exit code 1). Nothing here is
//! retried; every variant aborts the remaining stages.

use lockaudit_inputs::InputError;
use lockaudit_types::lockfile::LockfileKind;
use thiserror::Error;

/// Failure reported by a [`ReportClient`](crate::ports::ReportClient).
#[derive(Debug, Error)]
pub enum SubmitError {
    /// The registry answered with a non-success status.
    #[error("registry responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("could not decode audit report from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SubmitError {
    /// HTTP status, when the failure carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            SubmitError::Status { status, .. } => Some(*status),
            SubmitError::Transport { source, .. } | SubmitError::Decode { source, .. } => {
                source.status().map(|s| s.as_u16())
            }
            SubmitError::Other(_) => None,
        }
    }
}

/// The top-level error type for an audit run.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error("audit is not supported in global mode; run it inside a project")]
    GlobalModeUnsupported,

    #[error("unknown audit subcommand '{0}'; the only subcommand is 'fix'")]
    InvalidSubcommand(String),

    #[error(
        "errors were found in your {lockfile}, run an install to fix them:{}",
        indented_lines(.errors)
    )]
    LockVerify {
        lockfile: LockfileKind,
        errors: Vec<String>,
    },

    #[error("your configured registry ({registry}) does not support audit requests")]
    RegistryUnsupported {
        registry: String,
        #[source]
        source: SubmitError,
    },

    #[error(transparent)]
    Submit(#[from] SubmitError),

    /// A collaborator (verifier, printer, updater, installer) failed.
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl AuditError {
    /// Returns true if the error stems from how the command was invoked.
    pub fn is_usage(&self) -> bool {
        matches!(self, AuditError::InvalidSubcommand(_))
    }

    /// Returns the recommended process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        if self.is_usage() { 2 } else { 1 }
    }
}

fn indented_lines(lines: &[String]) -> String {
    lines.iter().map(|l| format!("\n    {l}")).collect()
}
