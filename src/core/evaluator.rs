use crate::core::matcher::matches;
use crate::core::{Issue, UserRules};
use std::collections::BTreeSet;

/// Collects the users with at least one rule matching `issue`.
pub fn evaluate(user_rules: &[UserRules], issue: &Issue) -> BTreeSet<String> {
    user_rules
        .iter()
        .filter(|entry| entry.rules.iter().any(|rule| matches(issue, rule)))
        .map(|entry| entry.user.clone())
        .collect()
}
