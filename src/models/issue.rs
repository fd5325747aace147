//! Issue data as seen by the labeler

use serde::Deserialize;
use std::fmt;

/// Open/closed state of an issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

/// Current state of an issue, as returned by the tracker
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issue {
    pub state: IssueState,

    /// Free-text description; GitHub returns `null` for issues created
    /// without one
    #[serde(default)]
    pub body: Option<String>,
}

impl Issue {
    pub fn is_closed(&self) -> bool {
        self.state == IssueState::Closed
    }

    /// Body text, `None` when absent or empty
    pub fn body_text(&self) -> Option<&str> {
        self.body.as_deref().filter(|body| !body.is_empty())
    }
}

/// Coordinates of an issue in a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IssueRef {
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl IssueRef {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }
}

impl fmt::Display for IssueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
