//! Two-phase fix execution: update in place, then install.

use crate::error::AuditError;
use crate::ports::{Installer, Updater};
use lockaudit_types::plan::RemediationPlan;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    /// Announce the plan without touching the dependency tree.
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Info,
    Warn,
}

/// A message emitted before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateCall {
    pub modules: Vec<String>,
    pub depth: u32,
}

/// What a fix run did (or, in a dry run, would have done).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExecutionReport {
    pub notices: Vec<Notice>,
    pub updated: Option<UpdateCall>,
    pub installed: Option<Vec<String>>,
    pub dry_run: bool,
}

/// Build the pre-execution notices for a plan.
pub fn notices_for(plan: &RemediationPlan) -> Vec<Notice> {
    let mut notices = Vec::new();

    if !plan.update.is_empty() || !plan.major.is_empty() {
        notices.push(Notice {
            level: NoticeLevel::Info,
            message: "updating vulnerable dependencies".to_string(),
        });
    }
    if !plan.major.is_empty() {
        notices.push(Notice {
            level: NoticeLevel::Warn,
            message: format!(
                "installing breaking changes: {}",
                plan.major.join(", ")
            ),
        });
    }
    if !plan.review.is_empty() {
        notices.push(Notice {
            level: NoticeLevel::Warn,
            message: format!(
                "{} issue(s) need manual review; run `lockaudit` without `fix` for details",
                plan.review.len()
            ),
        });
    }

    notices
}

/// Run the plan against the updater and installer.
///
/// The installer only starts after the updater has finished successfully; an
/// updater failure aborts the run with nothing installed.
pub async fn execute(
    plan: &RemediationPlan,
    updater: &dyn Updater,
    installer: &dyn Installer,
    options: ExecuteOptions,
) -> Result<ExecutionReport, AuditError> {
    let notices = notices_for(plan);
    for notice in &notices {
        match notice.level {
            NoticeLevel::Info => info!("{}", notice.message),
            NoticeLevel::Warn => warn!("{}", notice.message),
        }
    }

    let mut report = ExecutionReport {
        notices,
        dry_run: options.dry_run,
        ..ExecutionReport::default()
    };

    if plan.is_noop() {
        info!("nothing to fix");
        return Ok(report);
    }

    if !plan.update.is_empty() {
        let call = UpdateCall {
            modules: plan.update.clone(),
            depth: plan.max_depth,
        };
        if !options.dry_run {
            updater.update(&call.modules, call.depth).await?;
        }
        report.updated = Some(call);
    }

    let specs = plan.install_specs();
    if !specs.is_empty() {
        if !options.dry_run {
            installer.install(&specs).await?;
        }
        report.installed = Some(specs);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lockaudit_types::audit::{ActionKind, RemediationAction};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail_update: bool,
    }

    impl Recorder {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Updater for Recorder {
        async fn update(&self, modules: &[String], depth: u32) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("update {} depth={depth}", modules.join(",")));
            if self.fail_update {
                anyhow::bail!("update failed");
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Installer for Recorder {
        async fn install(&self, specs: &[String]) -> anyhow::Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("install {}", specs.join(",")));
            Ok(())
        }
    }

    fn plan_with(update: &[&str], major: &[&str], install: &[&str], depth: u32) -> RemediationPlan {
        let owned = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        RemediationPlan {
            update: owned(update),
            major: owned(major),
            install: owned(install),
            review: vec![],
            max_depth: depth,
        }
    }

    #[tokio::test]
    async fn update_runs_before_install_with_majors_first() {
        let rec = Recorder::default();
        let plan = plan_with(&["a", "b"], &["d@5.0.0"], &["c@3.0.0"], 3);

        let report = execute(&plan, &rec, &rec, ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(
            rec.calls(),
            vec!["update a,b depth=3", "install d@5.0.0,c@3.0.0"]
        );
        assert_eq!(
            report.updated,
            Some(UpdateCall {
                modules: vec!["a".to_string(), "b".to_string()],
                depth: 3
            })
        );
    }

    #[tokio::test]
    async fn installer_untouched_without_install_specs() {
        let rec = Recorder::default();
        let plan = plan_with(&["a"], &[], &[], 1);

        let report = execute(&plan, &rec, &rec, ExecuteOptions::default())
            .await
            .unwrap();

        assert_eq!(rec.calls(), vec!["update a depth=1"]);
        assert_eq!(report.installed, None);
    }

    #[tokio::test]
    async fn update_failure_skips_install() {
        let rec = Recorder {
            fail_update: true,
            ..Recorder::default()
        };
        let plan = plan_with(&["a"], &[], &["c@3.0.0"], 1);

        let err = execute(&plan, &rec, &rec, ExecuteOptions::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AuditError::Internal(_)));
        assert_eq!(rec.calls(), vec!["update a depth=1"]);
    }

    #[tokio::test]
    async fn empty_plan_is_a_noop() {
        let rec = Recorder::default();
        let report = execute(
            &RemediationPlan::default(),
            &rec,
            &rec,
            ExecuteOptions::default(),
        )
        .await
        .unwrap();

        assert!(rec.calls().is_empty());
        assert_eq!(report, ExecutionReport::default());
    }

    #[tokio::test]
    async fn dry_run_records_without_invoking() {
        let rec = Recorder::default();
        let plan = plan_with(&["a"], &["d@5.0.0"], &[], 2);

        let report = execute(&plan, &rec, &rec, ExecuteOptions { dry_run: true })
            .await
            .unwrap();

        assert!(rec.calls().is_empty());
        assert!(report.dry_run);
        assert_eq!(report.installed, Some(vec!["d@5.0.0".to_string()]));
        assert_eq!(report.updated.map(|u| u.depth), Some(2));
    }

    #[test]
    fn notices_cover_majors_and_reviews() {
        let mut plan = plan_with(&[], &["d@5.0.0"], &[], 0);
        plan.review.push(RemediationAction {
            module: "x".to_string(),
            action: ActionKind::Review,
            ..RemediationAction::default()
        });

        let notices = notices_for(&plan);
        let levels: Vec<_> = notices.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NoticeLevel::Info, NoticeLevel::Warn, NoticeLevel::Warn]
        );
        assert!(notices[1].message.contains("d@5.0.0"));
        assert!(notices[2].message.contains("manual review"));
    }

    #[test]
    fn install_only_plan_has_no_update_notice() {
        let plan = plan_with(&[], &[], &["c@3.0.0"], 0);
        assert!(notices_for(&plan).is_empty());
    }
}
