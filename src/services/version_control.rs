use async_trait::async_trait;

use crate::domain::branch::BranchName;
use crate::error::AppResult;

#[async_trait]
pub trait VersionControlService: Send + Sync {
    /// Fails unless the workspace is inside a working tree.
    async fn ensure_repository(&self) -> AppResult<()>;
    async fn branch_exists(&self, branch: &BranchName) -> AppResult<bool>;
    async fn create_and_checkout(&self, branch: &BranchName) -> AppResult<()>;
    async fn checkout(&self, branch: &BranchName) -> AppResult<()>;
    /// Pushes to `origin` and sets the upstream.
    async fn push(&self, branch: &BranchName) -> AppResult<()>;
}
