//! Rendering helpers (text and JSON) for human-readable audit output.

use lockaudit_types::audit::{ActionKind, AuditResult, RemediationAction};
use lockaudit_types::plan::RemediationPlan;
use serde::Serialize;

pub fn render_report_text(result: &AuditResult) -> String {
    let meta = &result.metadata;
    let counts = &meta.vulnerabilities;

    let mut out = String::new();
    out.push_str("# lockaudit report\n\n");
    out.push_str(&format!(
        "- Dependencies scanned: {} (dev {}, optional {})\n",
        meta.total_dependencies, meta.dev_dependencies, meta.optional_dependencies
    ));
    out.push_str(&format!(
        "- Vulnerabilities: {} (info {}, low {}, moderate {}, high {}, critical {})\n\n",
        counts.total(),
        counts.info,
        counts.low,
        counts.moderate,
        counts.high,
        counts.critical
    ));

    out.push_str("## Advisories\n\n");
    if result.advisories.is_empty() {
        out.push_str("_No vulnerabilities found._\n");
    } else {
        let mut advisories: Vec<_> = result.advisories.values().collect();
        advisories.sort_by(|a, b| b.severity.cmp(&a.severity).then(a.id.cmp(&b.id)));
        for adv in advisories {
            out.push_str(&format!("### {} {}\n\n", adv.id, adv.title));
            out.push_str(&format!("- Severity: `{}`\n", adv.severity));
            out.push_str(&format!("- Package: `{}`\n", adv.module_name));
            if let Some(v) = &adv.vulnerable_versions {
                out.push_str(&format!("- Vulnerable: {}\n", v));
            }
            if let Some(v) = &adv.patched_versions {
                out.push_str(&format!("- Patched: {}\n", v));
            }
            if let Some(r) = &adv.recommendation {
                out.push_str(&format!("- Recommendation: {}\n", r));
            }
            if let Some(url) = &adv.url {
                out.push_str(&format!("- More info: {}\n", url));
            }
            out.push('\n');
        }
    }

    if !result.actions.is_empty() {
        out.push_str("\n## Actions\n\n");
        for action in &result.actions {
            out.push_str(&format!("- {}\n", action_line(action)));
        }
    }

    out
}

pub fn render_plan_text(plan: &RemediationPlan) -> String {
    let mut out = String::new();
    out.push_str("# lockaudit fix plan\n\n");
    if plan.is_noop() && plan.review.is_empty() {
        out.push_str("_Nothing to fix._\n");
        return out;
    }

    if !plan.update.is_empty() {
        out.push_str(&format!(
            "- Update (depth {}): {}\n",
            plan.max_depth,
            plan.update.join(", ")
        ));
    }
    if !plan.major.is_empty() {
        out.push_str(&format!(
            "- Install, breaking: {}\n",
            plan.major.join(", ")
        ));
    }
    if !plan.install.is_empty() {
        out.push_str(&format!("- Install: {}\n", plan.install.join(", ")));
    }
    if !plan.review.is_empty() {
        out.push_str(&format!(
            "- Manual review: {}\n",
            plan.review
                .iter()
                .map(|a| a.module.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    out
}

/// Pretty JSON with a trailing newline.
pub fn render_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let mut s = serde_json::to_string_pretty(value)?;
    s.push('\n');
    Ok(s)
}

fn action_line(action: &RemediationAction) -> String {
    let breaking = if action.is_major {
        " (breaking change)"
    } else {
        ""
    };
    match action.action {
        ActionKind::Install => format!("install `{}`{}", action.spec(), breaking),
        ActionKind::Update => format!(
            "update `{}` to {} (depth {}){}",
            action.module, action.target, action.depth, breaking
        ),
        ActionKind::Review => {
            let ids: Vec<String> = action.resolves.iter().map(|r| r.id.to_string()).collect();
            if ids.is_empty() {
                format!("review `{}` manually", action.module)
            } else {
                format!(
                    "review `{}` manually (advisories {})",
                    action.module,
                    ids.join(", ")
                )
            }
        }
        ActionKind::Unrecognized => format!("unrecognized action for `{}`", action.module),
    }
}
