use std::io;

use clap::Args;
use tracing::debug;

use crate::context::AppContext;
use crate::domain::branch::BranchType;
use crate::error::AppResult;
use crate::workflow::create::{CreateTicketRequest, create_ticket};

#[derive(Args, Debug, Clone)]
pub struct CreateArgs {
    /// Ticket summary.
    #[arg(short, long)]
    pub summary: String,
    /// Ticket description (defaults to the summary).
    #[arg(short, long)]
    pub description: Option<String>,
    /// Jira project key; overrides the profile's `project`.
    #[arg(long)]
    pub project: Option<String>,
    /// Jira issue type.
    #[arg(long = "type", default_value = "Task")]
    pub issue_type: String,
    /// Branch type (detected from the issue type if omitted).
    #[arg(long)]
    pub branch_type: Option<BranchType>,
    /// Don't create a git branch.
    #[arg(long)]
    pub no_branch: bool,
    /// Don't push the branch to origin.
    #[arg(long)]
    pub no_push: bool,
    /// Don't open a pull request.
    #[arg(long)]
    pub no_pr: bool,
    /// Base branch for the pull request.
    #[arg(long, default_value = "master")]
    pub base: String,
    /// Jira profile from the config file.
    #[arg(short, long)]
    pub profile: Option<String>,
}

pub async fn run(ctx: &AppContext, args: CreateArgs) -> AppResult<()> {
    let request = CreateTicketRequest {
        project: args.project,
        summary: args.summary,
        description: args.description,
        issue_type: args.issue_type,
        branch_type: args.branch_type,
        create_branch: !args.no_branch,
        push: !args.no_push,
        open_pull_request: !args.no_pr,
        base: args.base,
    };
    let mut stdout = io::stdout();
    let outcome = create_ticket(ctx, &request, &mut stdout).await?;
    debug!(
        key = %outcome.ticket.key,
        id = %outcome.ticket.id,
        branch = ?outcome.branch,
        pull_request = ?outcome.pull_request,
        "create workflow finished"
    );
    Ok(())
}
