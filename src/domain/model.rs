use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// An issue as seen by the rule engine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Issue {
    pub number: u64,
    pub url: String,
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
    pub assignees: BTreeSet<String>,
}

/// How newly matched users are reconciled with an issue's existing assignees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Strategy {
    /// Add matched users to whoever is already assigned.
    #[default]
    Append,
    /// Assign matched users only when nobody is assigned yet.
    Set,
    /// Replace the assignees with exactly the matched users.
    Change,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Append => "append",
            Strategy::Set => "set",
            Strategy::Change => "change",
        };
        f.write_str(name)
    }
}

/// Output of the resolver for one issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub final_assignees: BTreeSet<String>,
    pub changed: bool,
}

/// Everything decided about one issue during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDecision {
    pub issue: Issue,
    pub matched: BTreeSet<String>,
    pub final_assignees: BTreeSet<String>,
    pub changed: bool,
    /// Label to add because the issue ends up unassigned.
    pub fallback_label: Option<String>,
}

impl AssignmentDecision {
    pub fn needs_update(&self) -> bool {
        self.changed || self.fallback_label.is_some()
    }

    pub fn patch(&self) -> IssuePatch {
        let labels = self.fallback_label.as_ref().map(|label| {
            let mut labels = self.issue.labels.clone();
            labels.insert(label.clone());
            labels
        });

        IssuePatch {
            assignees: self.changed.then(|| self.final_assignees.clone()),
            labels,
        }
    }
}

/// Fields sent to the tracker in a single update request. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssuePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeSet<String>>,
}
