//! In-memory service fakes shared by the workflow tests.

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::config::{AppConfig, Credentials};
use crate::context::AppContext;
use crate::domain::branch::BranchName;
use crate::domain::ticket::{Account, NewTicket, Project, Ticket, Transition};
use crate::error::{AppError, AppResult};
use crate::services::pull_request::PullRequestDraft;
use crate::services::{IssueTrackerService, PullRequestService, VersionControlService};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionBehavior {
    Applied,
    Unavailable,
    Fails,
}

pub struct FakeTracker {
    pub issue_type: String,
    pub missing: bool,
    pub transition: TransitionBehavior,
    pub comment_fails: bool,
    pub calls: Mutex<Vec<String>>,
}

impl Default for FakeTracker {
    fn default() -> Self {
        Self {
            issue_type: "Story".to_string(),
            missing: false,
            transition: TransitionBehavior::Applied,
            comment_fails: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl FakeTracker {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl IssueTrackerService for FakeTracker {
    async fn get_issue(&self, key: &str) -> AppResult<Value> {
        self.record(format!("get_issue {key}"));
        if self.missing {
            return Err(AppError::NotFound(format!("ticket {key}")));
        }
        Ok(json!({
            "key": key,
            "fields": {
                "summary": "Add login page",
                "issuetype": { "name": self.issue_type },
                "status": { "name": "To Do" },
                "description": "Users need to sign in.",
            }
        }))
    }

    async fn get_transitions(&self, key: &str) -> Vec<Transition> {
        self.record(format!("get_transitions {key}"));
        Vec::new()
    }

    async fn transition_issue(&self, key: &str, transition_name: &str) -> AppResult<bool> {
        self.record(format!("transition {key} {transition_name}"));
        match self.transition {
            TransitionBehavior::Applied => Ok(true),
            TransitionBehavior::Unavailable => Ok(false),
            TransitionBehavior::Fails => Err(AppError::IssueTracker(
                "failed to call Jira: connection reset".to_string(),
            )),
        }
    }

    async fn add_comment(&self, key: &str, text: &str) -> AppResult<()> {
        self.record(format!("comment {key} {text}"));
        if self.comment_fails {
            return Err(AppError::IssueTracker(
                "Jira responded with 500 Internal Server Error: ".to_string(),
            ));
        }
        Ok(())
    }

    async fn create_issue(&self, ticket: &NewTicket) -> AppResult<Ticket> {
        self.record(format!(
            "create {} {} {}",
            ticket.project, ticket.issue_type, ticket.summary
        ));
        Ok(Ticket {
            key: format!("{}-7", ticket.project),
            id: "10007".to_string(),
            url: format!("https://jira.example/browse/{}-7", ticket.project),
        })
    }

    async fn myself(&self) -> AppResult<Account> {
        Ok(Account {
            display_name: Some("Dev".to_string()),
            account_id: Some("abc".to_string()),
        })
    }

    async fn list_projects(&self) -> AppResult<Vec<Project>> {
        Ok(vec![Project {
            key: "PROJ".to_string(),
            name: "Project".to_string(),
        }])
    }

    async fn search_recent(&self, _limit: usize) -> AppResult<Vec<Value>> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
pub struct FakeVcs {
    pub outside_repository: bool,
    pub push_fails: bool,
    pub branches: Mutex<BTreeSet<String>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeVcs {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl VersionControlService for FakeVcs {
    async fn ensure_repository(&self) -> AppResult<()> {
        self.record("ensure_repository".to_string());
        if self.outside_repository {
            return Err(AppError::VersionControl("not a git repository".to_string()));
        }
        Ok(())
    }

    async fn branch_exists(&self, branch: &BranchName) -> AppResult<bool> {
        Ok(self.branches.lock().unwrap().contains(branch.as_str()))
    }

    async fn create_and_checkout(&self, branch: &BranchName) -> AppResult<()> {
        self.record(format!("create {branch}"));
        let inserted = self.branches.lock().unwrap().insert(branch.to_string());
        if !inserted {
            return Err(AppError::VersionControl(format!(
                "a branch named '{branch}' already exists"
            )));
        }
        Ok(())
    }

    async fn checkout(&self, branch: &BranchName) -> AppResult<()> {
        self.record(format!("checkout {branch}"));
        Ok(())
    }

    async fn push(&self, branch: &BranchName) -> AppResult<()> {
        self.record(format!("push {branch}"));
        if self.push_fails {
            return Err(AppError::VersionControl("remote rejected".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct FakePullRequests {
    pub fails: bool,
    pub drafts: Mutex<Vec<PullRequestDraft>>,
}

#[async_trait]
impl PullRequestService for FakePullRequests {
    async fn open_pull_request(&self, draft: &PullRequestDraft) -> AppResult<String> {
        self.drafts.lock().unwrap().push(draft.clone());
        if self.fails {
            return Err(AppError::VersionControl("gh not installed".to_string()));
        }
        Ok("https://github.example/pr/1".to_string())
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        credentials: Credentials {
            url: "https://jira.example".to_string(),
            email: "dev@example.com".to_string(),
            token: "token".to_string(),
        },
        profile: None,
        default_project: Some("PROJ".to_string()),
        source: None,
        workspace_root: PathBuf::from("."),
    }
}

pub fn context_with(
    tracker: &Arc<FakeTracker>,
    vcs: &Arc<FakeVcs>,
    pull_requests: &Arc<FakePullRequests>,
) -> AppContext {
    AppContext::new(
        test_config(),
        vcs.clone(),
        tracker.clone(),
        pull_requests.clone(),
    )
}
