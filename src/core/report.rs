use crate::core::AssignmentDecision;
use std::collections::BTreeSet;

/// What happened to one issue during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutcomeStatus {
    /// Nothing to send.
    Unchanged,
    /// An update was needed but the run is a dry run.
    DryRun,
    Updated,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct IssueOutcome {
    pub decision: AssignmentDecision,
    pub status: OutcomeStatus,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub repo: String,
    pub outcomes: Vec<IssueOutcome>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub unchanged: usize,
    pub dry_run: usize,
    pub updated: usize,
    pub failed: usize,
}

impl RunReport {
    pub fn summary(&self) -> RunSummary {
        self.outcomes
            .iter()
            .fold(RunSummary::default(), |mut summary, outcome| {
                match outcome.status {
                    OutcomeStatus::Unchanged => summary.unchanged += 1,
                    OutcomeStatus::DryRun => summary.dry_run += 1,
                    OutcomeStatus::Updated => summary.updated += 1,
                    OutcomeStatus::Failed(_) => summary.failed += 1,
                }
                summary
            })
    }

    pub fn has_failures(&self) -> bool {
        self.outcomes
            .iter()
            .any(|o| matches!(o.status, OutcomeStatus::Failed(_)))
    }
}

/// Renders the per-issue block: `=` kept, `+` added, `-` removed.
pub fn render_decision(repo: &str, decision: &AssignmentDecision) -> String {
    let issue = &decision.issue;
    let mut out = format!("-> {}#{} ({})\n", repo, issue.number, issue.url);

    let everyone: BTreeSet<&String> = issue
        .assignees
        .iter()
        .chain(decision.final_assignees.iter())
        .collect();

    for user in everyone {
        let marker = match (
            issue.assignees.contains(user),
            decision.final_assignees.contains(user),
        ) {
            (true, true) => '=',
            (false, true) => '+',
            _ => '-',
        };
        out.push_str(&format!("   {} {}\n", marker, user));
    }

    if let Some(label) = &decision.fallback_label {
        out.push_str(&format!("   FALLBACK: added label \"{}\"\n", label));
    }

    out
}

pub fn render_failure(repo: &str, decision: &AssignmentDecision) -> String {
    format!("   ERROR: Could not update issue {}#{}", repo, decision.issue.number)
}
