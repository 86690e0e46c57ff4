use clap::ValueEnum;

use crate::context::AppContext;
use crate::domain::ticket::{Transition, TicketView};
use crate::error::AppResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TicketFormat {
    Json,
    Markdown,
    Plain,
}

/// Renders a ticket in the requested format, optionally listing its transitions.
pub async fn fetch_ticket(
    ctx: &AppContext,
    key: &str,
    format: TicketFormat,
    show_transitions: bool,
) -> AppResult<String> {
    let key = key.trim();
    let issue = ctx.issue_tracker.get_issue(key).await?;

    let mut output = match format {
        TicketFormat::Json => serde_json::to_string_pretty(&issue)?,
        TicketFormat::Markdown => TicketView::from_issue(&issue).to_markdown(),
        TicketFormat::Plain => TicketView::from_issue(&issue).to_plain(),
    };

    if show_transitions {
        let transitions = ctx.issue_tracker.get_transitions(key).await;
        output.push_str(&render_transitions(&transitions));
    }

    Ok(output)
}

fn render_transitions(transitions: &[Transition]) -> String {
    let mut section = String::from("\n\n## Available Transitions\n\n");
    if transitions.is_empty() {
        section.push_str("(none known)\n");
    }
    for transition in transitions {
        section.push_str(&format!("- {} (ID: {})\n", transition.name, transition.id));
    }
    section
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::AppError;
    use crate::workflow::testing::{FakePullRequests, FakeTracker, FakeVcs, context_with};

    fn context(tracker: FakeTracker) -> AppContext {
        context_with(
            &Arc::new(tracker),
            &Arc::new(FakeVcs::default()),
            &Arc::new(FakePullRequests::default()),
        )
    }

    #[tokio::test]
    async fn renders_each_format() {
        let ctx = context(FakeTracker::default());

        let json = fetch_ticket(&ctx, "PROJ-1", TicketFormat::Json, false).await.unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["key"], "PROJ-1");

        let markdown = fetch_ticket(&ctx, "PROJ-1", TicketFormat::Markdown, false)
            .await
            .unwrap();
        assert!(markdown.starts_with("# [PROJ-1] Add login page"));
        assert!(markdown.contains("Users need to sign in."));

        let plain = fetch_ticket(&ctx, " PROJ-1 ", TicketFormat::Plain, false)
            .await
            .unwrap();
        assert_eq!(
            plain,
            "Ticket: PROJ-1\nSummary: Add login page\nType: Story\nStatus: To Do\n"
        );
    }

    #[tokio::test]
    async fn appends_transitions_section() {
        let ctx = context(FakeTracker::default());
        let output = fetch_ticket(&ctx, "PROJ-1", TicketFormat::Plain, true)
            .await
            .unwrap();
        assert!(output.ends_with("## Available Transitions\n\n(none known)\n"));
    }

    #[test]
    fn lists_transition_names_and_ids() {
        let rendered = render_transitions(&[Transition {
            id: "21".to_string(),
            name: "In Progress".to_string(),
        }]);
        assert!(rendered.contains("- In Progress (ID: 21)"));
    }

    #[tokio::test]
    async fn missing_ticket_is_an_error() {
        let ctx = context(FakeTracker {
            missing: true,
            ..FakeTracker::default()
        });
        let err = fetch_ticket(&ctx, "NOPE-1", TicketFormat::Markdown, false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
