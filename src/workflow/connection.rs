use std::io::Write;

use crate::context::AppContext;
use crate::domain::ticket::TicketView;
use crate::error::AppResult;

const RECENT_ISSUES: usize = 5;

/// Authenticates, then lists projects and recent issues. Only authentication is fatal.
pub async fn test_connection(ctx: &AppContext, out: &mut dyn Write) -> AppResult<()> {
    let credentials = &ctx.config.credentials;
    writeln!(out, "Testing connection to: {}", credentials.url)?;
    writeln!(out, "Using email: {}\n", credentials.email)?;

    writeln!(out, "Test 1: Authenticating...")?;
    let account = ctx.issue_tracker.myself().await?;
    writeln!(out, "Authentication successful!")?;
    writeln!(
        out,
        "  User: {}",
        account.display_name.as_deref().unwrap_or("Unknown")
    )?;
    writeln!(
        out,
        "  Account ID: {}\n",
        account.account_id.as_deref().unwrap_or("Unknown")
    )?;

    writeln!(out, "Test 2: Fetching projects...")?;
    match ctx.issue_tracker.list_projects().await {
        Ok(projects) if projects.is_empty() => writeln!(out, "Warning: no projects found\n")?,
        Ok(projects) => {
            writeln!(out, "Found {} project(s):", projects.len())?;
            for project in &projects {
                writeln!(out, "  - {}: {}", project.key, project.name)?;
            }
            writeln!(out)?;
        }
        Err(err) => writeln!(out, "Warning: error fetching projects: {err}\n")?,
    }

    writeln!(out, "Test 3: Searching for recent issues...")?;
    match ctx.issue_tracker.search_recent(RECENT_ISSUES).await {
        Ok(issues) if issues.is_empty() => {
            writeln!(out, "Search successful, no issues found yet.")?
        }
        Ok(issues) => {
            writeln!(out, "Search successful! Recent issues:")?;
            for issue in &issues {
                let view = TicketView::from_issue(issue);
                writeln!(out, "  [{}] {}", view.key, view.summary)?;
                writeln!(out, "      Type: {}, Status: {}", view.issue_type, view.status)?;
            }
        }
        Err(err) => {
            writeln!(out, "Could not search issues: {err}")?;
            writeln!(out, "    This is OK if your Jira is empty")?;
        }
    }

    let rule = "=".repeat(60);
    writeln!(out, "\n{rule}")?;
    writeln!(out, "Connection test complete!")?;
    writeln!(out, "{rule}")?;
    Ok(())
}
