use crate::core::evaluator::evaluate;
use crate::core::report::{IssueOutcome, OutcomeStatus, RunReport};
use crate::core::resolver::resolve;
use crate::core::{AssignmentDecision, Issue, IssueTracker, RuleSet, Strategy};
use crate::utils::error::{AssignerError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Run-wide settings that stay fixed for every issue.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub repo: String,
    pub strategy: Strategy,
    pub dry_run: bool,
    pub concurrency: usize,
}

/// Applies a rule set to every open issue of one repository.
pub struct Assigner<T: IssueTracker> {
    tracker: Arc<T>,
    rules: RuleSet,
    settings: RunSettings,
}

impl<T: IssueTracker + 'static> Assigner<T> {
    /// Creates an assigner that owns its tracker.
    pub fn new(tracker: T, rules: RuleSet, settings: RunSettings) -> Self {
        Self::with_shared_tracker(Arc::new(tracker), rules, settings)
    }

    /// Creates an assigner around a tracker the caller keeps a handle to, e.g. to inspect
    /// recorded requests afterwards.
    pub fn with_shared_tracker(tracker: Arc<T>, rules: RuleSet, settings: RunSettings) -> Self {
        Self {
            tracker,
            rules,
            settings,
        }
    }

    /// Evaluates and resolves one issue without touching the tracker.
    pub fn decide(&self, issue: Issue) -> AssignmentDecision {
        let matched = evaluate(&self.rules.users, &issue);
        let resolution = resolve(self.settings.strategy, &issue.assignees, &matched);

        let fallback_label = self.rules.fallback_label.as_ref().filter(|label| {
            resolution.final_assignees.is_empty() && !issue.labels.contains(label.as_str())
        });

        AssignmentDecision {
            fallback_label: fallback_label.cloned(),
            matched,
            final_assignees: resolution.final_assignees,
            changed: resolution.changed,
            issue,
        }
    }

    /// Fetches every open issue and processes each one independently. Only a failure to
    /// list issues aborts the run; update failures are recorded in the report.
    pub async fn run(&self) -> Result<RunReport> {
        let repo = self.settings.repo.clone();
        tracing::info!(
            "Processing {} with strategy '{}'{}",
            repo,
            self.settings.strategy,
            if self.settings.dry_run { " (dry run)" } else { "" }
        );

        let issues = self
            .tracker
            .list_issues(&repo)
            .await
            .map_err(|e| match e {
                AssignerError::IssueFetchError { .. } => e,
                other => AssignerError::IssueFetchError {
                    repo: repo.clone(),
                    message: other.to_string(),
                },
            })?;
        tracing::info!("Fetched {} open issues", issues.len());

        let mut outcomes: Vec<Option<IssueOutcome>> = Vec::with_capacity(issues.len());
        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency.max(1)));
        let mut updates = JoinSet::new();
        let mut pending = HashMap::new();

        for (index, issue) in issues.into_iter().enumerate() {
            let decision = self.decide(issue);
            tracing::debug!(
                "#{}: matched {:?}, final {:?}, changed: {}",
                decision.issue.number,
                decision.matched,
                decision.final_assignees,
                decision.changed
            );

            if !decision.needs_update() {
                outcomes.push(Some(IssueOutcome {
                    decision,
                    status: OutcomeStatus::Unchanged,
                }));
                continue;
            }

            if self.settings.dry_run {
                tracing::info!("Would update {}#{}", repo, decision.issue.number);
                outcomes.push(Some(IssueOutcome {
                    decision,
                    status: OutcomeStatus::DryRun,
                }));
                continue;
            }

            outcomes.push(None);
            let snapshot = decision.clone();
            let tracker = Arc::clone(&self.tracker);
            let semaphore = Arc::clone(&semaphore);
            let repo = repo.clone();
            let handle = updates.spawn(async move {
                // The semaphore is never closed, so acquiring cannot fail.
                let _permit = semaphore.acquire_owned().await.ok();
                let status = persist(tracker.as_ref(), &repo, &decision).await;
                (index, IssueOutcome { decision, status })
            });
            pending.insert(handle.id(), (index, snapshot));
        }

        while let Some(joined) = updates.join_next().await {
            match joined {
                Ok((index, outcome)) => outcomes[index] = Some(outcome),
                Err(e) => {
                    tracing::error!("Update task failed: {}", e);
                    if let Some((index, decision)) = pending.remove(&e.id()) {
                        outcomes[index] = Some(IssueOutcome {
                            decision,
                            status: OutcomeStatus::Failed(e.to_string()),
                        });
                    }
                }
            }
        }

        let mut report = RunReport {
            repo,
            outcomes: Vec::with_capacity(outcomes.len()),
        };
        report.outcomes.extend(outcomes.into_iter().flatten());

        let summary = report.summary();
        tracing::info!(
            "Done: {} updated, {} would update, {} unchanged, {} failed",
            summary.updated,
            summary.dry_run,
            summary.unchanged,
            summary.failed
        );

        Ok(report)
    }
}

async fn persist<T: IssueTracker + ?Sized>(
    tracker: &T,
    repo: &str,
    decision: &AssignmentDecision,
) -> OutcomeStatus {
    let number = decision.issue.number;
    match tracker.update_issue(repo, number, &decision.patch()).await {
        Ok(()) => {
            tracing::info!("Updated {}#{}", repo, number);
            OutcomeStatus::Updated
        }
        Err(e) => {
            tracing::warn!("Failed to update {}#{}: {}", repo, number, e);
            OutcomeStatus::Failed(e.to_string())
        }
    }
}
