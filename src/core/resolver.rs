//! Reconciles matched users with the assignees an issue already has.
//!
//! The resolver knows nothing about dry runs: the orchestrator decides whether a
//! resolution is sent to the tracker.

use crate::core::{Resolution, Strategy};
use std::collections::BTreeSet;

/// Rewrites matched logins to the spelling the tracker already uses for them.
///
/// GitHub logins are case-insensitive, so a rule configured for `Alice` names the same
/// account as an existing assignee `alice`; the tracker's spelling wins.
fn align_to_current(current: &BTreeSet<String>, matched: &BTreeSet<String>) -> BTreeSet<String> {
    matched
        .iter()
        .map(|user| {
            current
                .iter()
                .find(|assignee| assignee.eq_ignore_ascii_case(user))
                .unwrap_or(user)
                .clone()
        })
        .collect()
}

/// Computes the final assignee set for one issue and whether it differs from `current`.
///
/// - `Append`: union of current and matched users.
/// - `Set`: matched users, but only when the issue has no assignees.
/// - `Change`: exactly the matched users, possibly clearing the issue.
pub fn resolve(
    strategy: Strategy,
    current: &BTreeSet<String>,
    matched: &BTreeSet<String>,
) -> Resolution {
    let aligned = align_to_current(current, matched);
    let matched = &aligned;

    match strategy {
        Strategy::Append => Resolution {
            final_assignees: current.union(matched).cloned().collect(),
            changed: !matched.is_subset(current),
        },
        Strategy::Set if current.is_empty() => Resolution {
            final_assignees: matched.clone(),
            changed: !matched.is_empty(),
        },
        Strategy::Set => Resolution {
            final_assignees: current.clone(),
            changed: false,
        },
        Strategy::Change => Resolution {
            final_assignees: matched.clone(),
            changed: matched != current,
        },
    }
}
