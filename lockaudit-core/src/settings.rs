//! Clap-free settings for the audit pipeline.

use crate::error::AuditError;
use camino::Utf8PathBuf;
use lockaudit_types::audit::Severity;
use serde::Deserialize;

pub const DEFAULT_REGISTRY: &str = "https://registry.npmjs.org/";

/// What the run does once the report is in hand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuditMode {
    #[default]
    Report,
    Fix,
}

impl AuditMode {
    /// Interpret the optional first positional argument.
    ///
    /// Absent or empty means report mode; `fix` is the only subcommand.
    pub fn from_arg(arg: Option<&str>) -> Result<Self, AuditError> {
        match arg {
            None | Some("") => Ok(AuditMode::Report),
            Some("fix") => Ok(AuditMode::Fix),
            Some(other) => Err(AuditError::InvalidSubcommand(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// An external program plus its leading arguments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommandSpec {
    pub program: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn default_updater() -> Self {
        Self::new("npm", &["update"])
    }

    pub fn default_installer() -> Self {
        Self::new("npm", &["install"])
    }

    /// Shell-style rendering for logs and error messages.
    pub fn display_with(&self, extra: &[String]) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .chain(extra.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Settings for one audit run.
#[derive(Debug, Clone)]
pub struct AuditSettings {
    pub project_root: Utf8PathBuf,
    pub registry: String,
    pub mode: AuditMode,
    pub global: bool,

    // Report mode
    pub audit_level: Severity,
    pub format: OutputFormat,

    // Fix mode
    pub dry_run: bool,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            project_root: Utf8PathBuf::from("."),
            registry: DEFAULT_REGISTRY.to_string(),
            mode: AuditMode::default(),
            global: false,
            audit_level: Severity::Low,
            format: OutputFormat::default(),
            dry_run: false,
        }
    }
}
