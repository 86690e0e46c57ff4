use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::document::text_of;
use crate::error::{AppError, AppResult};

static TICKET_KEY_RE: LazyLock<Regex> =
    LazyLock::new(|| match Regex::new(r"^[A-Za-z][A-Za-z0-9_]*-\d+$") {
        Ok(re) => re,
        Err(_) => unreachable!("static regex pattern"),
    });

const ACCEPTANCE_MARKERS: [&str; 4] = ["acceptance criteria", "ac:", "acceptance:", "criteria:"];
const COMMENT_LIMIT: usize = 5;

/// Fields requested when fetching a single issue.
pub const ISSUE_FIELDS: &str =
    "summary,description,status,priority,assignee,reporter,issuetype,created,updated,comment,subtasks,parent";

#[derive(Debug, Clone)]
pub struct NewTicket {
    pub project: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    pub key: String,
    pub id: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub display_name: Option<String>,
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentView {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtaskView {
    pub key: String,
    pub summary: String,
    pub status: String,
}

/// Read-only projection of the issue JSON returned by the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketView {
    pub key: String,
    pub summary: String,
    pub issue_type: String,
    pub status: String,
    pub priority: String,
    pub assignee: String,
    pub reporter: String,
    pub description: String,
    pub comments: Vec<CommentView>,
    pub subtasks: Vec<SubtaskView>,
}

impl TicketView {
    pub fn from_issue(issue: &Value) -> Self {
        let fields = &issue["fields"];

        let comments = fields["comment"]["comments"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|comment| CommentView {
                        author: str_or(&comment["author"]["displayName"], "Unknown"),
                        body: text_of(comment.get("body")).unwrap_or_default(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let subtasks = fields["subtasks"]
            .as_array()
            .map(|items| {
                items
                    .iter()
                    .map(|subtask| SubtaskView {
                        key: str_or(&subtask["key"], ""),
                        summary: str_or(&subtask["fields"]["summary"], "No summary"),
                        status: str_or(&subtask["fields"]["status"]["name"], "Unknown"),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            key: str_or(&issue["key"], ""),
            summary: str_or(&fields["summary"], "No summary"),
            issue_type: str_or(&fields["issuetype"]["name"], "Unknown"),
            status: str_or(&fields["status"]["name"], "Unknown"),
            priority: str_or(&fields["priority"]["name"], "None"),
            assignee: str_or(&fields["assignee"]["displayName"], "Unassigned"),
            reporter: str_or(&fields["reporter"]["displayName"], "Unknown"),
            description: text_of(fields.get("description"))
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| "No description".to_string()),
            comments,
            subtasks,
        }
    }

    /// Raw issue type name, without the display fallback.
    pub fn raw_issue_type(issue: &Value) -> Option<&str> {
        issue["fields"]["issuetype"]["name"].as_str()
    }

    /// Raw summary, without the display fallback.
    pub fn raw_summary(issue: &Value) -> Option<&str> {
        issue["fields"]["summary"].as_str()
    }

    /// Boxed overview printed before starting work.
    pub fn to_overview(&self, description_limit: usize) -> String {
        let rule = "=".repeat(60);
        format!(
            "\n{rule}\n[{key}] {summary}\n{rule}\nType: {issue_type}\nStatus: {status}\nPriority: {priority}\nAssignee: {assignee}\n\nDescription:\n{description}\n{rule}\n",
            key = self.key,
            summary = self.summary,
            issue_type = self.issue_type,
            status = self.status,
            priority = self.priority,
            assignee = self.assignee,
            description = truncate_chars(&self.description, description_limit),
        )
    }

    pub fn to_markdown(&self) -> String {
        let mut md = format!("# [{}] {}\n\n", self.key, self.summary);
        md.push_str(&format!("**Type:** {}  \n", self.issue_type));
        md.push_str(&format!("**Status:** {}  \n", self.status));
        md.push_str(&format!("**Priority:** {}  \n", self.priority));
        md.push_str(&format!("**Assignee:** {}  \n", self.assignee));
        md.push_str(&format!("**Reporter:** {}  \n", self.reporter));
        md.push_str(&format!("\n## Description\n\n{}\n", self.description));

        if let Some(criteria) = acceptance_criteria(&self.description) {
            md.push_str(&format!("\n## Acceptance Criteria\n\n{criteria}\n"));
        }

        if !self.comments.is_empty() {
            md.push_str(&format!("\n## Comments ({})\n\n", self.comments.len()));
            for comment in self.comments.iter().take(COMMENT_LIMIT) {
                md.push_str(&format!("**{}:**\n{}\n\n", comment.author, comment.body));
            }
        }

        if !self.subtasks.is_empty() {
            md.push_str(&format!("\n## Subtasks ({})\n\n", self.subtasks.len()));
            for subtask in &self.subtasks {
                md.push_str(&format!(
                    "- [{}] {} ({})\n",
                    subtask.key, subtask.summary, subtask.status
                ));
            }
        }

        md
    }

    pub fn to_plain(&self) -> String {
        format!(
            "Ticket: {}\nSummary: {}\nType: {}\nStatus: {}\n",
            self.key, self.summary, self.issue_type, self.status
        )
    }
}

/// Text from the first acceptance-criteria marker to the end of the description.
/// Accepts keys shaped like `PROJ-123` so they can be placed in a URL path as-is.
pub fn validate_ticket_key(key: &str) -> AppResult<&str> {
    if TICKET_KEY_RE.is_match(key) {
        Ok(key)
    } else {
        Err(AppError::InvalidTicketKey(key.to_string()))
    }
}

pub fn acceptance_criteria(description: &str) -> Option<&str> {
    let lowered = description.to_ascii_lowercase();
    ACCEPTANCE_MARKERS
        .iter()
        .find_map(|marker| lowered.find(marker))
        .map(|idx| &description[idx..])
}

/// Cuts `text` to `limit` characters, marking the cut with an ellipsis.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn str_or(value: &Value, fallback: &str) -> String {
    value.as_str().unwrap_or(fallback).to_string()
}
