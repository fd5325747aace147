//! Run configuration
//!
//! The labeler runs as a CI step. Settings come from command-line flags or the
//! environment GitHub Actions provides (`INPUT_*` for step inputs,
//! `GITHUB_REPOSITORY`, `GITHUB_EVENT_PATH` and `GITHUB_API_URL` for the
//! run context). Missing settings are fatal and are reported before any
//! request is made.

use crate::models::IssueRef;
use crate::tracker::github::DEFAULT_API_URL;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors raised while resolving the configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing GitHub token (use --github-token, INPUT_GITHUB-TOKEN or GITHUB_TOKEN)")]
    MissingToken,

    #[error("Missing required label (use --required-label or INPUT_REQUIRED-LABEL)")]
    MissingRequiredLabel,

    #[error("Missing repository (use --repository or GITHUB_REPOSITORY)")]
    MissingRepository,

    #[error("Invalid repository '{0}', expected 'owner/name'")]
    InvalidRepository(String),

    #[error("Missing issue number (use --issue or run on an issue event)")]
    MissingIssueNumber,

    #[error("Failed to read event payload '{}': {source}", .path.display())]
    ReadEventPayload {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid event payload '{}': {source}", .path.display())]
    InvalidEventPayload {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Raw settings as collected from flags and environment
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    pub github_token: Option<String>,
    pub required_label: Option<String>,
    /// `owner/name`
    pub repository: Option<String>,
    pub issue: Option<u64>,
    pub event_path: Option<PathBuf>,
    pub api_url: Option<String>,
}

impl ConfigSource {
    /// Fill the token from `GITHUB_TOKEN` when no input provided one
    pub fn with_env_fallbacks(mut self) -> Self {
        if non_empty(self.github_token.as_deref()).is_none() {
            self.github_token = std::env::var("GITHUB_TOKEN").ok();
        }
        self
    }
}

/// Validated configuration for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub token: String,
    pub required_label: String,
    pub issue: IssueRef,
    pub api_url: String,
}

impl Config {
    pub fn resolve(source: ConfigSource) -> Result<Self, ConfigError> {
        let token = non_empty(source.github_token.as_deref())
            .ok_or(ConfigError::MissingToken)?
            .to_string();
        let required_label = non_empty(source.required_label.as_deref())
            .ok_or(ConfigError::MissingRequiredLabel)?
            .to_string();

        let repository =
            non_empty(source.repository.as_deref()).ok_or(ConfigError::MissingRepository)?;
        let (owner, repo) = parse_repository(repository)?;

        let number = match source.issue {
            Some(number) => number,
            None => source
                .event_path
                .as_deref()
                .map(issue_number_from_event)
                .transpose()?
                .flatten()
                .ok_or(ConfigError::MissingIssueNumber)?,
        };

        let api_url = non_empty(source.api_url.as_deref())
            .unwrap_or(DEFAULT_API_URL)
            .to_string();

        Ok(Self {
            token,
            required_label,
            issue: IssueRef::new(owner, repo, number),
            api_url,
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Split `owner/name`
pub fn parse_repository(repository: &str) -> Result<(&str, &str), ConfigError> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner, repo))
        }
        _ => Err(ConfigError::InvalidRepository(repository.to_string())),
    }
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    issue: Option<NumberedItem>,
    pull_request: Option<NumberedItem>,
    number: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct NumberedItem {
    number: u64,
}

/// Read the issue number from a GitHub Actions event payload
///
/// Returns `Ok(None)` for events that do not concern an issue.
pub fn issue_number_from_event(path: &Path) -> Result<Option<u64>, ConfigError> {
    let content =
        std::fs::read_to_string(path).map_err(|source| ConfigError::ReadEventPayload {
            path: path.to_path_buf(),
            source,
        })?;

    let payload: EventPayload =
        serde_json::from_str(&content).map_err(|source| ConfigError::InvalidEventPayload {
            path: path.to_path_buf(),
            source,
        })?;

    Ok(payload
        .issue
        .or(payload.pull_request)
        .map(|item| item.number)
        .or(payload.number))
}
