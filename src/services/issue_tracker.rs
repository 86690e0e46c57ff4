use async_trait::async_trait;
use serde_json::Value;

use crate::domain::ticket::{Account, NewTicket, Project, Ticket, Transition};
use crate::error::AppResult;

#[async_trait]
pub trait IssueTrackerService: Send + Sync {
    /// Raw issue JSON. Authentication and not-found failures are distinct errors.
    async fn get_issue(&self, key: &str) -> AppResult<Value>;

    /// Transitions available from the issue's current status.
    ///
    /// Falls back to an empty list when the lookup fails, so an empty result
    /// means "no transitions known" rather than "none exist".
    async fn get_transitions(&self, key: &str) -> Vec<Transition>;

    /// Applies the transition whose name matches case-insensitively.
    /// Returns `false` when no such transition is offered.
    async fn transition_issue(&self, key: &str, transition_name: &str) -> AppResult<bool>;

    async fn add_comment(&self, key: &str, text: &str) -> AppResult<()>;

    async fn create_issue(&self, ticket: &NewTicket) -> AppResult<Ticket>;

    async fn myself(&self) -> AppResult<Account>;

    async fn list_projects(&self) -> AppResult<Vec<Project>>;

    async fn search_recent(&self, limit: usize) -> AppResult<Vec<Value>>;
}
