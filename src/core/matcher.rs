use crate::core::{Field, Issue, Rule};

/// Returns true when `rule` matches the part of `issue` it is scoped to.
pub fn matches(issue: &Issue, rule: &Rule) -> bool {
    let regex = rule.regex();
    match rule.field() {
        Field::Title => regex.is_match(&issue.title),
        Field::Text => regex.is_match(&issue.body),
        Field::Label => issue.labels.iter().any(|label| regex.is_match(label)),
        Field::Any => {
            regex.is_match(&issue.title)
                || issue.labels.iter().any(|label| regex.is_match(label))
                || regex.is_match(&issue.body)
        }
    }
}
