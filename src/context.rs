use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{IssueTrackerService, PullRequestService, VersionControlService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub version_control: Arc<dyn VersionControlService>,
    pub issue_tracker: Arc<dyn IssueTrackerService>,
    pub pull_requests: Arc<dyn PullRequestService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        version_control: Arc<dyn VersionControlService>,
        issue_tracker: Arc<dyn IssueTrackerService>,
        pull_requests: Arc<dyn PullRequestService>,
    ) -> Self {
        Self {
            config,
            version_control,
            issue_tracker,
            pull_requests,
        }
    }
}
