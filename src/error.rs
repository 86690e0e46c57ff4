use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid ticket key '{0}'; expected something like PROJ-123")]
    InvalidTicketKey(String),
    #[error("issue tracker error: {0}")]
    IssueTracker(String),
    #[error("version control error: {0}")]
    VersionControl(String),
    #[error("transition '{0}' is not available")]
    TransitionNotAvailable(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type AppResult<T> = Result<T, AppError>;
