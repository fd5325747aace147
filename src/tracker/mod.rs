//! Issue tracker interface
//!
//! The labeler only needs a handful of operations from the tracker. They sit
//! behind [`IssueTracker`] so the reconciliation flow can run against GitHub
//! in production and against an in-memory fake in tests.

pub mod github;

pub use github::GitHubTracker;

use crate::models::{Issue, IssueRef};
use async_trait::async_trait;

/// Errors reported by an issue tracker
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrackerError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Tracker request failed: {0}")]
    Transient(String),
}

impl TrackerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TrackerError::NotFound(_))
    }
}

/// Result type for tracker operations
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;

/// Operations the labeler performs against an issue tracker
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch the current state and body of an issue
    async fn get_issue(&self, issue: &IssueRef) -> TrackerResult<Issue>;

    /// List the names of the labels currently applied to an issue
    async fn list_labels(&self, issue: &IssueRef) -> TrackerResult<Vec<String>>;

    /// Check whether a label is registered in the issue's repository
    async fn label_exists(&self, issue: &IssueRef, name: &str) -> TrackerResult<bool>;

    /// Apply a label to an issue
    async fn add_label(&self, issue: &IssueRef, name: &str) -> TrackerResult<()>;

    /// Remove a label from an issue
    async fn remove_label(&self, issue: &IssueRef, name: &str) -> TrackerResult<()>;
}
