use lockaudit_types::lockfile::LockfileDocument;
use lockaudit_types::manifest::DependencySet;
use semver::{Version, VersionReq};
use serde::{Deserialize, Serialize};

/// Result of checking a lockfile against the declared dependencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyOutcome {
    pub ok: bool,

    #[serde(default)]
    pub errors: Vec<String>,
}

impl VerifyOutcome {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

/// Every declared dependency must be locked, and the locked version must satisfy the declared
/// range when both sides are plain semver. Errors come out in dependency-name order.
pub fn check_lock_consistency(
    lockfile: &LockfileDocument,
    dependencies: &DependencySet,
) -> VerifyOutcome {
    let mut errors = Vec::new();

    for (name, range) in dependencies {
        match lockfile.locked_version(name) {
            None => errors.push(format!("missing: {name}@{range}")),
            Some(locked) => {
                if satisfies(locked, range) == Some(false) {
                    errors.push(format!(
                        "invalid: lock file's {name}@{locked} does not satisfy {name}@{range}"
                    ));
                }
            }
        }
    }

    VerifyOutcome::from_errors(errors)
}

/// `None` when either side is not something semver can judge (tags, urls, `||` unions).
fn satisfies(locked: &str, range: &str) -> Option<bool> {
    let locked = Version::parse(locked.trim()).ok()?;
    let range = range.trim();

    // A bare version is an exact pin, not a caret requirement.
    if let Ok(exact) = Version::parse(range.trim_start_matches('=')) {
        return Some(locked == exact);
    }
    if range.contains("||") {
        return None;
    }

    let req = VersionReq::parse(&normalize_range(range)?).ok()?;
    Some(req.matches(&locked))
}

/// Rewrite an npm range into the comma-separated comparator list `VersionReq` reads.
///
/// `A - B` becomes `>=A, <=B`, an operator standing alone binds to the next token, and a bare
/// partial version (`1`, `1.2`) is an X-range rather than a caret.
fn normalize_range(range: &str) -> Option<String> {
    let tokens: Vec<&str> = range.split_whitespace().collect();
    if let [low, "-", high] = tokens.as_slice() {
        return Some(format!(">={low}, <={high}"));
    }

    let mut comparators = Vec::with_capacity(tokens.len());
    let mut pending_op: Option<&str> = None;
    for token in tokens {
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            if pending_op.replace(token).is_some() {
                return None;
            }
            continue;
        }
        let comparator = match pending_op.take() {
            Some(op) => format!("{op}{token}"),
            None if token.starts_with(|c: char| c.is_ascii_digit()) => bare_comparator(token),
            None => token.to_string(),
        };
        comparators.push(comparator);
    }

    if pending_op.is_some() || comparators.is_empty() {
        return None;
    }
    Some(comparators.join(", "))
}

fn bare_comparator(token: &str) -> String {
    if Version::parse(token).is_ok() {
        format!("={token}")
    } else if token.contains(['x', 'X', '*']) {
        token.to_string()
    } else {
        format!("~{token}")
    }
}
