use async_trait::async_trait;

use crate::domain::branch::BranchName;
use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct PullRequestDraft {
    pub title: String,
    pub body: String,
    pub base: String,
    pub head: BranchName,
}

#[async_trait]
pub trait PullRequestService: Send + Sync {
    /// Opens a pull request and returns its URL.
    async fn open_pull_request(&self, draft: &PullRequestDraft) -> AppResult<String>;
}
