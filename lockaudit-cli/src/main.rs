mod config;

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Parser;
use config::ConfigMerger;
use lockaudit_core::adapters::{
    CommandInstaller, CommandUpdater, HttpReportClient, LockfileVerifier,
    RegistryRequestGenerator, StdoutPrinter,
};
use lockaudit_core::executor::ExecutionReport;
use lockaudit_core::{
    AuditError, AuditMode, AuditOutcome, AuditSettings, OutputFormat, Ports, run_audit,
};
use lockaudit_render::{render_json, render_plan_text};
use lockaudit_types::audit::Severity;
use lockaudit_types::lockfile::LockfileKind;
use lockaudit_types::plan::RemediationPlan;
use serde::Serialize;
use std::io::Write;
use std::process::ExitCode;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "lockaudit",
    version,
    about = "Audit an npm project's lockfile against the registry and apply the suggested fixes."
)]
struct Cli {
    /// `fix` to apply remediations; omit to print the report.
    subcommand: Option<String>,

    /// Project root containing package.json (default: current directory).
    #[arg(long, default_value = ".")]
    project_root: Utf8PathBuf,

    /// Registry base URL (overrides lockaudit.toml).
    #[arg(long, env = "LOCKAUDIT_REGISTRY")]
    registry: Option<String>,

    /// Lowest severity that makes a report run fail (low, moderate, high, critical).
    #[arg(long)]
    audit_level: Option<Severity>,

    /// Print machine-readable JSON instead of text.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// In fix mode, announce the plan without running the package manager.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Audit the global package context.
    #[arg(short = 'g', long, default_value_t = false)]
    global: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// JSON shape printed after a fix run.
#[derive(Debug, Serialize)]
struct FixSummary<'a> {
    lockfile: LockfileKind,
    plan: &'a RemediationPlan,
    execution: &'a ExecutionReport,
}

#[tokio::main]
async fn main() -> ExitCode {
    match real_main().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            let code = e
                .downcast_ref::<AuditError>()
                .map_or(1, AuditError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn real_main() -> anyhow::Result<u8> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let mode = AuditMode::from_arg(cli.subcommand.as_deref())?;
    if cli.global {
        return Err(AuditError::GlobalModeUnsupported.into());
    }

    let file_config =
        config::load_or_default(&cli.project_root).context("load lockaudit.toml config")?;
    let merged = ConfigMerger::new(file_config).merge_args(cli.registry, cli.audit_level);
    debug!(
        "merged config: registry={}, audit_level={}, updater={:?}, installer={:?}",
        merged.registry, merged.audit_level, merged.updater, merged.installer
    );

    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };
    let settings = AuditSettings {
        project_root: cli.project_root.clone(),
        registry: merged.registry.clone(),
        mode,
        global: cli.global,
        audit_level: merged.audit_level,
        format,
        dry_run: cli.dry_run,
    };

    let verifier = LockfileVerifier;
    let generator = RegistryRequestGenerator::default();
    let client = HttpReportClient::new(&merged.registry)?;
    let printer = StdoutPrinter::new(format);
    let updater = CommandUpdater::new(merged.updater, cli.project_root.clone());
    let installer = CommandInstaller::new(merged.installer, cli.project_root.clone());

    let run = run_audit(
        &settings,
        Ports {
            verifier: &verifier,
            generator: &generator,
            client: &client,
            printer: &printer,
            updater: &updater,
            installer: &installer,
        },
    )
    .await?;

    if let AuditOutcome::Fix {
        plan, execution, ..
    } = &run.outcome
    {
        let out = match format {
            OutputFormat::Json => render_json(&FixSummary {
                lockfile: run.lockfile,
                plan,
                execution,
            })
            .context("serialize fix summary")?,
            OutputFormat::Text => {
                let mut text = render_plan_text(plan);
                if execution.dry_run {
                    text.push_str("\n_Dry run: no changes were made._\n");
                }
                text
            }
        };
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(out.as_bytes())
            .context("write fix summary to stdout")?;
    }

    Ok(run.outcome.exit_code())
}
