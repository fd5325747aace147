// version-labeler - keeps an issue's version label in sync with the version
// reported in its body

pub mod cli;
pub mod config;
pub mod extractor;
pub mod labels;
pub mod models;
pub mod parser;
pub mod tracker;

pub use anyhow::{Context, Result};
pub use colored::Colorize;

// Re-export commonly used types
pub use extractor::{normalize_version, version_from_body, VersionExtractor};
pub use labels::{plan_labels, target_label, LabelPlan, ReconcileReport};
pub use models::{Issue, IssueRef, IssueState, Section};
pub use tracker::{GitHubTracker, IssueTracker, TrackerError};
