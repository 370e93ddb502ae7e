use lockaudit_types::audit::{ActionKind, RemediationAction};
use lockaudit_types::plan::RemediationPlan;
use tracing::debug;

enum Bucket {
    Major,
    Install,
    Update,
    Review,
    Drop,
}

/// First matching rule wins: a major action lands in `major` whatever its kind.
fn classify(action: &RemediationAction) -> Bucket {
    if action.is_major {
        return Bucket::Major;
    }
    match action.action {
        ActionKind::Install => Bucket::Install,
        ActionKind::Update => Bucket::Update,
        ActionKind::Review => Bucket::Review,
        ActionKind::Unrecognized => Bucket::Drop,
    }
}

/// Sort remediation actions into plan buckets, preserving input order within each bucket.
pub fn plan(actions: &[RemediationAction]) -> RemediationPlan {
    let mut plan = RemediationPlan::default();

    for action in actions {
        match classify(action) {
            Bucket::Major => plan.major.push(action.spec()),
            Bucket::Install => plan.install.push(action.spec()),
            Bucket::Update => {
                plan.update.push(action.module.clone());
                plan.max_depth = plan.max_depth.max(action.depth);
            }
            Bucket::Review => plan.review.push(action.clone()),
            Bucket::Drop => {
                debug!(module = %action.module, "dropping unrecognized remediation action");
            }
        }
    }

    plan
}
