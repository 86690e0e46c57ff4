use std::io;

use clap::Args;
use tracing::debug;

use crate::context::AppContext;
use crate::domain::branch::BranchType;
use crate::error::AppResult;
use crate::workflow::start::{StartWorkRequest, start_work};

#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Jira ticket key (e.g., PROJ-123).
    #[arg(short, long)]
    pub ticket: String,
    /// Branch type: feature, bugfix, hotfix or refactor (detected from the issue type if omitted).
    #[arg(long)]
    pub branch_type: Option<BranchType>,
    /// Skip moving the ticket to "In Progress".
    #[arg(long)]
    pub no_status_update: bool,
    /// Skip posting the "started work" comment.
    #[arg(long)]
    pub no_comment: bool,
    /// Jira profile from the config file.
    #[arg(short, long)]
    pub profile: Option<String>,
}

pub async fn run(ctx: &AppContext, args: StartArgs) -> AppResult<()> {
    let request = StartWorkRequest {
        ticket: args.ticket,
        branch_type: args.branch_type,
        update_status: !args.no_status_update,
        add_comment: !args.no_comment,
    };
    let mut stdout = io::stdout();
    let outcome = start_work(ctx, &request, &mut stdout).await?;
    debug!(
        branch = %outcome.branch,
        created = outcome.branch_created,
        status_update = ?outcome.status_update,
        comment = ?outcome.comment,
        "start workflow finished"
    );
    Ok(())
}
