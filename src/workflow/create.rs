use std::io::Write;

use crate::context::AppContext;
use crate::domain::branch::{BranchName, BranchType};
use crate::domain::ticket::{NewTicket, Ticket};
use crate::error::{AppError, AppResult};
use crate::services::pull_request::PullRequestDraft;
use crate::workflow::branch::prepare_branch;

#[derive(Debug, Clone)]
pub struct CreateTicketRequest {
    pub project: Option<String>,
    pub summary: String,
    pub description: Option<String>,
    pub issue_type: String,
    pub branch_type: Option<BranchType>,
    pub create_branch: bool,
    pub push: bool,
    pub open_pull_request: bool,
    pub base: String,
}

#[derive(Debug, Clone)]
pub struct CreateTicketOutcome {
    pub ticket: Ticket,
    pub branch: Option<BranchName>,
    pub pull_request: Option<String>,
}

pub async fn create_ticket(
    ctx: &AppContext,
    request: &CreateTicketRequest,
    out: &mut dyn Write,
) -> AppResult<CreateTicketOutcome> {
    let project = request
        .project
        .clone()
        .or_else(|| ctx.config.default_project.clone())
        .ok_or_else(|| {
            AppError::Configuration(
                "no project given; pass --project or set `project` in the profile".to_string(),
            )
        })?;

    let summary = request.summary.trim();
    let description = request
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(summary);

    writeln!(out, "Creating Jira ticket in {project}...")?;
    let ticket = ctx
        .issue_tracker
        .create_issue(&NewTicket {
            project,
            summary: summary.to_string(),
            description: description.to_string(),
            issue_type: request.issue_type.clone(),
        })
        .await?;
    writeln!(out, "Created ticket: {}", ticket.key)?;
    writeln!(out, "  URL: {}", ticket.url)?;

    if !request.create_branch {
        return Ok(CreateTicketOutcome {
            ticket,
            branch: None,
            pull_request: None,
        });
    }

    let branch_type = request
        .branch_type
        .unwrap_or_else(|| BranchType::from_issue_type(&request.issue_type));
    writeln!(out, "\nCreating git branch...")?;
    let branch = prepare_branch(
        ctx.version_control.as_ref(),
        &ticket.key,
        summary,
        branch_type,
        out,
    )
    .await?
    .name;

    let mut pull_request = None;
    if request.push {
        writeln!(out, "\nPushing to origin...")?;
        ctx.version_control.push(&branch).await?;
        writeln!(out, "Pushed to origin/{branch}")?;

        if request.open_pull_request {
            pull_request =
                open_pull_request(ctx, &ticket, summary, &branch, &request.base, out).await?;
        }
    }

    writeln!(out, "\nComplete!")?;
    writeln!(out, "   Ticket: {}", ticket.url)?;
    writeln!(out, "   Branch: {branch}")?;
    if let Some(url) = &pull_request {
        writeln!(out, "   PR: {url}")?;
    }

    Ok(CreateTicketOutcome {
        ticket,
        branch: Some(branch),
        pull_request,
    })
}

async fn open_pull_request(
    ctx: &AppContext,
    ticket: &Ticket,
    summary: &str,
    branch: &BranchName,
    base: &str,
    out: &mut dyn Write,
) -> AppResult<Option<String>> {
    writeln!(out, "\nCreating pull request...")?;
    let draft = PullRequestDraft {
        title: format!("[{}] {}", ticket.key, summary),
        body: pull_request_body(ticket),
        base: base.to_string(),
        head: branch.clone(),
    };
    match ctx.pull_requests.open_pull_request(&draft).await {
        Ok(url) => {
            writeln!(out, "Created PR: {url}")?;
            Ok(Some(url))
        }
        Err(err) => {
            writeln!(out, "Warning: skipping pull request, {err}")?;
            Ok(None)
        }
    }
}

fn pull_request_body(ticket: &Ticket) -> String {
    format!(
        "## Jira Ticket\n{url}\n\n## Description\nImplementing changes for {key}\n\n## Changes\n- [ ] Implementation complete\n- [ ] Tests added\n- [ ] Documentation updated\n",
        url = ticket.url,
        key = ticket.key,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::workflow::testing::{FakePullRequests, FakeTracker, FakeVcs, context_with};

    fn request() -> CreateTicketRequest {
        CreateTicketRequest {
            project: None,
            summary: "Fix crash on save".to_string(),
            description: None,
            issue_type: "Bug".to_string(),
            branch_type: None,
            create_branch: true,
            push: true,
            open_pull_request: true,
            base: "master".to_string(),
        }
    }

    #[tokio::test]
    async fn creates_ticket_branch_push_and_pull_request() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs::default());
        let prs = Arc::new(FakePullRequests::default());
        let ctx = context_with(&tracker, &vcs, &prs);
        let mut out: Vec<u8> = Vec::new();

        let outcome = create_ticket(&ctx, &request(), &mut out).await.unwrap();

        assert_eq!(outcome.ticket.key, "PROJ-7");
        assert_eq!(
            outcome.branch.as_ref().map(BranchName::as_str),
            Some("bugfix/proj-7-fix-crash-on-save")
        );
        assert_eq!(outcome.pull_request.as_deref(), Some("https://github.example/pr/1"));
        assert_eq!(tracker.calls(), vec!["create PROJ Bug Fix crash on save"]);
        assert!(vcs.calls().contains(&"push bugfix/proj-7-fix-crash-on-save".to_string()));

        let drafts = prs.drafts.lock().unwrap();
        assert_eq!(drafts[0].title, "[PROJ-7] Fix crash on save");
        assert_eq!(drafts[0].base, "master");
        assert!(drafts[0].body.contains("https://jira.example/browse/PROJ-7"));
    }

    #[tokio::test]
    async fn explicit_project_wins_over_profile_default() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs::default());
        let ctx = context_with(&tracker, &vcs, &Arc::new(FakePullRequests::default()));

        let outcome = create_ticket(
            &ctx,
            &CreateTicketRequest {
                project: Some("OPS".to_string()),
                create_branch: false,
                ..request()
            },
            &mut Vec::<u8>::new(),
        )
        .await
        .unwrap();

        assert_eq!(outcome.ticket.key, "OPS-7");
        assert!(outcome.branch.is_none());
        assert!(vcs.calls().is_empty());
    }

    #[tokio::test]
    async fn missing_project_is_a_configuration_error() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs::default());
        let mut ctx = context_with(&tracker, &vcs, &Arc::new(FakePullRequests::default()));
        ctx.config.default_project = None;

        let err = create_ticket(&ctx, &request(), &mut Vec::<u8>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(tracker.calls().is_empty());
    }

    #[tokio::test]
    async fn push_failure_is_fatal() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs {
            push_fails: true,
            ..FakeVcs::default()
        });
        let prs = Arc::new(FakePullRequests::default());
        let ctx = context_with(&tracker, &vcs, &prs);

        let err = create_ticket(&ctx, &request(), &mut Vec::<u8>::new())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::VersionControl(_)));
        assert!(prs.drafts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn pull_request_failure_is_a_warning() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs::default());
        let prs = Arc::new(FakePullRequests {
            fails: true,
            ..FakePullRequests::default()
        });
        let ctx = context_with(&tracker, &vcs, &prs);
        let mut out: Vec<u8> = Vec::new();

        let outcome = create_ticket(&ctx, &request(), &mut out).await.unwrap();

        assert!(outcome.pull_request.is_none());
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Warning: skipping pull request"));
        assert!(printed.contains("Complete!"));
    }

    #[tokio::test]
    async fn no_push_skips_pull_request() {
        let tracker = Arc::new(FakeTracker::default());
        let vcs = Arc::new(FakeVcs::default());
        let prs = Arc::new(FakePullRequests::default());
        let ctx = context_with(&tracker, &vcs, &prs);

        let outcome = create_ticket(
            &ctx,
            &CreateTicketRequest {
                push: false,
                ..request()
            },
            &mut Vec::<u8>::new(),
        )
        .await
        .unwrap();

        assert!(outcome.branch.is_some());
        assert!(prs.drafts.lock().unwrap().is_empty());
        assert!(!vcs.calls().iter().any(|call| call.starts_with("push")));
    }
}
