use std::io::Write;

use crate::domain::branch::{BranchName, BranchType};
use crate::error::{AppError, AppResult};
use crate::services::VersionControlService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBranch {
    pub name: BranchName,
    pub created: bool,
}

/// Checks out the ticket's branch, creating it unless it already exists locally.
pub async fn prepare_branch(
    version_control: &dyn VersionControlService,
    ticket_key: &str,
    summary: &str,
    branch_type: BranchType,
    out: &mut dyn Write,
) -> AppResult<PreparedBranch> {
    let name = BranchName::from_parts(branch_type, ticket_key, summary);

    version_control
        .ensure_repository()
        .await
        .map_err(|err| branch_failure(&name, err))?;

    let exists = version_control
        .branch_exists(&name)
        .await
        .map_err(|err| branch_failure(&name, err))?;

    if exists {
        writeln!(out, "Branch '{name}' already exists, switching to it")?;
        version_control
            .checkout(&name)
            .await
            .map_err(|err| branch_failure(&name, err))?;
        return Ok(PreparedBranch {
            name,
            created: false,
        });
    }

    version_control
        .create_and_checkout(&name)
        .await
        .map_err(|err| branch_failure(&name, err))?;
    writeln!(out, "Created and checked out branch: {name}")?;

    Ok(PreparedBranch {
        name,
        created: true,
    })
}

fn branch_failure(name: &BranchName, err: AppError) -> AppError {
    match err {
        AppError::VersionControl(message) => {
            AppError::VersionControl(format!("failed to create branch {name}: {message}"))
        }
        other => AppError::VersionControl(format!("failed to create branch {name}: {other}")),
    }
}
