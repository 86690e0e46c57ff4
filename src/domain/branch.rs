use std::fmt;
use std::str::FromStr;

const SLUG_MAX_LEN: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchType {
    Feature,
    Bugfix,
    Hotfix,
    Refactor,
}

impl BranchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BranchType::Feature => "feature",
            BranchType::Bugfix => "bugfix",
            BranchType::Hotfix => "hotfix",
            BranchType::Refactor => "refactor",
        }
    }

    /// Maps a tracker issue type onto a branch prefix. Unknown types are features.
    pub fn from_issue_type(issue_type: &str) -> Self {
        match issue_type.trim().to_lowercase().as_str() {
            "bug" => BranchType::Bugfix,
            "story" | "task" | "epic" | "subtask" | "sub-task" | "improvement" => {
                BranchType::Feature
            }
            _ => BranchType::Feature,
        }
    }
}

impl FromStr for BranchType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "feature" => Ok(BranchType::Feature),
            "bugfix" => Ok(BranchType::Bugfix),
            "hotfix" => Ok(BranchType::Hotfix),
            "refactor" => Ok(BranchType::Refactor),
            other => Err(format!(
                "unknown branch type '{other}' (expected feature, bugfix, hotfix or refactor)"
            )),
        }
    }
}

impl fmt::Display for BranchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchName(pub String);

impl BranchName {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `type/key-slug`, with the key lowercased. An empty slug drops the suffix.
    pub fn from_parts(branch_type: BranchType, ticket_key: &str, summary: &str) -> Self {
        let clean_ticket = ticket_key.trim().to_lowercase();
        let slug = slugify(summary);
        if slug.is_empty() {
            Self(format!("{}/{}", branch_type.as_str(), clean_ticket))
        } else {
            Self(format!("{}/{}-{}", branch_type.as_str(), clean_ticket, slug))
        }
    }
}

impl fmt::Display for BranchName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn slugify(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut pending_dash = false;

    for ch in input.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !result.is_empty() {
                result.push('-');
            }
            pending_dash = false;
            result.push(ch.to_ascii_lowercase());
        } else if ch.is_whitespace() || ch == '-' {
            pending_dash = true;
        }
        // everything else is dropped without separating words
    }

    if result.len() > SLUG_MAX_LEN {
        result.truncate(SLUG_MAX_LEN);
    }
    result.trim_end_matches('-').to_string()
}
