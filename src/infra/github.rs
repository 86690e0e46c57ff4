use std::path::PathBuf;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::services::PullRequestService;
use crate::services::pull_request::PullRequestDraft;

/// Opens pull requests through the GitHub CLI.
pub struct GhCli {
    workspace_root: PathBuf,
}

impl GhCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }
}

#[async_trait]
impl PullRequestService for GhCli {
    async fn open_pull_request(&self, draft: &PullRequestDraft) -> AppResult<String> {
        debug!(head = draft.head.as_str(), base = %draft.base, "running gh pr create");
        let output = Command::new("gh")
            .args([
                "pr",
                "create",
                "--title",
                draft.title.as_str(),
                "--body",
                draft.body.as_str(),
                "--base",
                draft.base.as_str(),
                "--head",
                draft.head.as_str(),
            ])
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| {
                AppError::VersionControl(format!(
                    "failed to run gh (is the GitHub CLI installed?): {err}"
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "pull request creation failed: {}",
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
