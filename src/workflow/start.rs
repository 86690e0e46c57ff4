use std::fmt;
use std::io::Write;

use tracing::debug;

use crate::context::AppContext;
use crate::domain::branch::{BranchName, BranchType};
use crate::domain::ticket::TicketView;
use crate::error::{AppError, AppResult};
use crate::workflow::branch::prepare_branch;

pub const IN_PROGRESS: &str = "In Progress";
const DESCRIPTION_PREVIEW: usize = 200;

#[derive(Debug, Clone)]
pub struct StartWorkRequest {
    pub ticket: String,
    pub branch_type: Option<BranchType>,
    pub update_status: bool,
    pub add_comment: bool,
}

/// Result of an advisory step that never aborts the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Completed,
    Skipped,
    Warned(String),
}

#[derive(Debug, Clone)]
pub struct StartWorkOutcome {
    pub branch: BranchName,
    pub branch_created: bool,
    pub status_update: StepOutcome,
    pub comment: StepOutcome,
}

/// Fetches the ticket, checks out its branch, then marks it in progress and
/// leaves a comment. Only the fetch and branch steps are fatal.
pub async fn start_work(
    ctx: &AppContext,
    request: &StartWorkRequest,
    out: &mut dyn Write,
) -> AppResult<StartWorkOutcome> {
    let key = request.ticket.trim();
    writeln!(out, "Starting work on {key}...\n")?;

    writeln!(out, "Fetching ticket details...")?;
    let issue = ctx.issue_tracker.get_issue(key).await?;
    writeln!(out, "Fetched ticket")?;

    let view = TicketView::from_issue(&issue);
    report(
        out,
        format_args!("{}", view.to_overview(DESCRIPTION_PREVIEW).trim_end()),
    );

    let issue_type = TicketView::raw_issue_type(&issue).unwrap_or("Story");
    let branch_type = request
        .branch_type
        .unwrap_or_else(|| BranchType::from_issue_type(issue_type));
    let summary = TicketView::raw_summary(&issue).unwrap_or("no-summary");

    let branch = prepare_branch(
        ctx.version_control.as_ref(),
        key,
        summary,
        branch_type,
        out,
    )
    .await?;

    let status_update = if request.update_status {
        update_status(ctx, key, out).await
    } else {
        StepOutcome::Skipped
    };

    let comment = if request.add_comment {
        post_start_comment(ctx, key, &branch.name, out).await
    } else {
        StepOutcome::Skipped
    };

    let rule = "=".repeat(60);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "Ready to work on {key}!")?;
    writeln!(out, "{rule}")?;
    writeln!(out, "Branch: {}", branch.name)?;
    writeln!(out, "\nNext steps:")?;
    writeln!(out, "  1. Start coding")?;
    writeln!(out, "  2. Commit with: git commit -m '{key}: your message'")?;
    writeln!(out, "  3. Push when ready: git push origin {}", branch.name)?;
    writeln!(out, "{rule}")?;

    Ok(StartWorkOutcome {
        branch: branch.name,
        branch_created: branch.created,
        status_update,
        comment,
    })
}

async fn update_status(ctx: &AppContext, key: &str, out: &mut dyn Write) -> StepOutcome {
    report(out, format_args!("Updating ticket status..."));
    match ctx.issue_tracker.transition_issue(key, IN_PROGRESS).await {
        Ok(true) => {
            report(out, format_args!("Updated status to '{IN_PROGRESS}'"));
            StepOutcome::Completed
        }
        Ok(false) => {
            let warning = AppError::TransitionNotAvailable(IN_PROGRESS.to_string()).to_string();
            report(
                out,
                format_args!(
                    "Warning: could not update status, {warning} (it may already be in progress)"
                ),
            );
            StepOutcome::Warned(warning)
        }
        Err(err) => {
            report(out, format_args!("Warning: status update failed: {err}"));
            StepOutcome::Warned(err.to_string())
        }
    }
}

async fn post_start_comment(
    ctx: &AppContext,
    key: &str,
    branch: &BranchName,
    out: &mut dyn Write,
) -> StepOutcome {
    report(out, format_args!("Adding comment to ticket..."));
    let comment = format!("Started working on this ticket in branch: {branch}");
    match ctx.issue_tracker.add_comment(key, &comment).await {
        Ok(()) => {
            report(out, format_args!("Added comment"));
            StepOutcome::Completed
        }
        Err(err) => {
            report(out, format_args!("Warning: failed to add comment: {err}"));
            StepOutcome::Warned(err.to_string())
        }
    }
}

/// Progress output for steps that must not abort the run.
fn report(out: &mut dyn Write, line: fmt::Arguments<'_>) {
    if let Err(err) = writeln!(out, "{line}") {
        debug!(error = %err, "failed to write progress output");
    }
}
