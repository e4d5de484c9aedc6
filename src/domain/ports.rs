use crate::domain::model::{Issue, IssuePatch};
use crate::utils::error::Result;
use async_trait::async_trait;

/// The remote issue tracker the assigner reads from and writes to.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Lists the open issues of `repo` (`owner/name`).
    async fn list_issues(&self, repo: &str) -> Result<Vec<Issue>>;

    /// Applies `patch` to one issue in a single request.
    async fn update_issue(&self, repo: &str, number: u64, patch: &IssuePatch) -> Result<()>;
}
