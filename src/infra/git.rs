use std::path::PathBuf;
use std::process::Output;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::domain::branch::BranchName;
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

pub struct GitCli {
    workspace_root: PathBuf,
}

impl GitCli {
    pub fn new(workspace_root: PathBuf) -> Self {
        Self { workspace_root }
    }

    async fn output(&self, args: &[&str]) -> AppResult<Output> {
        debug!(?args, root = %self.workspace_root.display(), "running git");
        Command::new("git")
            .args(args)
            .current_dir(&self.workspace_root)
            .output()
            .await
            .map_err(|err| AppError::VersionControl(format!("failed to run git: {err}")))
    }

    async fn run(&self, args: &[&str]) -> AppResult<String> {
        let output = self.output(args).await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AppError::VersionControl(format!(
                "`git {}` failed ({}): {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl VersionControlService for GitCli {
    async fn ensure_repository(&self) -> AppResult<()> {
        let output = self.output(&["rev-parse", "--git-dir"]).await?;
        if !output.status.success() {
            return Err(AppError::VersionControl(format!(
                "{} is not a git repository",
                self.workspace_root.display()
            )));
        }
        Ok(())
    }

    async fn branch_exists(&self, branch: &BranchName) -> AppResult<bool> {
        let listed = self.run(&["branch", "--list", branch.as_str()]).await?;
        Ok(!listed.is_empty())
    }

    async fn create_and_checkout(&self, branch: &BranchName) -> AppResult<()> {
        if branch.as_str().is_empty() {
            return Err(AppError::VersionControl(
                "branch name cannot be empty".to_string(),
            ));
        }
        self.run(&["checkout", "-b", branch.as_str()]).await?;
        Ok(())
    }

    async fn checkout(&self, branch: &BranchName) -> AppResult<()> {
        self.run(&["checkout", branch.as_str()]).await?;
        Ok(())
    }

    async fn push(&self, branch: &BranchName) -> AppResult<()> {
        self.run(&["push", "-u", "origin", branch.as_str()]).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    async fn init_repo(path: &Path) -> GitCli {
        let git = GitCli::new(path.to_path_buf());
        git.run(&["init", "--quiet"]).await.unwrap();
        git.run(&[
            "-c",
            "user.name=Test",
            "-c",
            "user.email=test@example.com",
            "commit",
            "--allow-empty",
            "--quiet",
            "-m",
            "init",
        ])
        .await
        .unwrap();
        git
    }

    #[tokio::test]
    async fn rejects_directory_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let git = GitCli::new(dir.path().to_path_buf());
        let err = git.ensure_repository().await.unwrap_err();
        assert!(matches!(err, AppError::VersionControl(_)));
    }

    #[tokio::test]
    async fn creates_and_detects_branches() {
        let dir = tempfile::tempdir().unwrap();
        let git = init_repo(dir.path()).await;
        git.ensure_repository().await.unwrap();

        let branch = BranchName("feature/proj-1-demo".to_string());
        assert!(!git.branch_exists(&branch).await.unwrap());

        git.create_and_checkout(&branch).await.unwrap();
        assert!(git.branch_exists(&branch).await.unwrap());
        assert_eq!(
            git.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await.unwrap(),
            "feature/proj-1-demo"
        );

        let err = git.create_and_checkout(&branch).await.unwrap_err();
        assert!(matches!(err, AppError::VersionControl(_)));
    }

    #[tokio::test]
    async fn checks_out_existing_branch() {
        let dir = tempfile::tempdir().unwrap();
        let git = init_repo(dir.path()).await;
        let home_branch = git.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await.unwrap();

        let branch = BranchName("bugfix/proj-3-retry".to_string());
        git.create_and_checkout(&branch).await.unwrap();
        git.run(&["checkout", "--quiet", home_branch.as_str()]).await.unwrap();
        assert!(git.branch_exists(&branch).await.unwrap());

        git.checkout(&branch).await.unwrap();
        assert_eq!(
            git.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await.unwrap(),
            "bugfix/proj-3-retry"
        );

        let missing = BranchName("feature/proj-404".to_string());
        let err = git.checkout(&missing).await.unwrap_err();
        assert!(matches!(err, AppError::VersionControl(_)));
    }

    #[tokio::test]
    async fn push_without_remote_fails() {
        let dir = tempfile::tempdir().unwrap();
        let git = init_repo(dir.path()).await;
        let branch = BranchName("feature/proj-2".to_string());
        git.create_and_checkout(&branch).await.unwrap();
        assert!(git.push(&branch).await.is_err());
    }
}
