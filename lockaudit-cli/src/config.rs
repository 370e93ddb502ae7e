//! Configuration file loading for lockaudit.
//!
//! Discovers and loads `lockaudit.toml` from the project root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use lockaudit_core::CommandSpec;
use lockaudit_core::settings::DEFAULT_REGISTRY;
use lockaudit_types::audit::Severity;
use serde::Deserialize;
use tracing::debug;

/// The config file name to search for.
pub const CONFIG_FILE_NAME: &str = "lockaudit.toml";

/// Top-level configuration from lockaudit.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LockauditConfig {
    /// Registry base URL.
    pub registry: Option<String>,

    /// Lowest severity that fails a report run.
    pub audit_level: Option<Severity>,

    /// Command used for in-place updates.
    pub updater: Option<CommandSpec>,

    /// Command used for installs.
    pub installer: Option<CommandSpec>,
}

/// Discover the lockaudit.toml config file in the project root.
pub fn discover_config(project_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = project_root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

/// Load and parse a lockaudit.toml config file.
pub fn load_config(path: &Utf8Path) -> anyhow::Result<LockauditConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<LockauditConfig> {
    let config: LockauditConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the project root, or return default if not found.
pub fn load_or_default(project_root: &Utf8Path) -> anyhow::Result<LockauditConfig> {
    match discover_config(project_root) {
        Some(path) => load_config(&path),
        None => Ok(LockauditConfig::default()),
    }
}

/// Config file and CLI arguments folded together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedConfig {
    pub registry: String,
    pub audit_level: Severity,
    pub updater: CommandSpec,
    pub installer: CommandSpec,
}

/// Builder for merging config file with CLI arguments.
pub struct ConfigMerger {
    config: LockauditConfig,
}

impl ConfigMerger {
    pub fn new(config: LockauditConfig) -> Self {
        Self { config }
    }

    /// CLI values win over the file; the file wins over built-in defaults.
    pub fn merge_args(
        self,
        cli_registry: Option<String>,
        cli_audit_level: Option<Severity>,
    ) -> MergedConfig {
        MergedConfig {
            registry: cli_registry
                .or(self.config.registry)
                .unwrap_or_else(|| DEFAULT_REGISTRY.to_string()),
            audit_level: cli_audit_level
                .or(self.config.audit_level)
                .unwrap_or(Severity::Low),
            updater: self
                .config
                .updater
                .unwrap_or_else(CommandSpec::default_updater),
            installer: self
                .config
                .installer
                .unwrap_or_else(CommandSpec::default_installer),
        }
    }
}
