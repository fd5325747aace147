//! GitHub REST API implementation of [`IssueTracker`]

use super::{IssueTracker, TrackerError, TrackerResult};
use crate::models::{Issue, IssueRef};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public GitHub API endpoint
pub const DEFAULT_API_URL: &str = "https://api.github.com";

const PAGE_SIZE: usize = 100;

/// Label as returned by the GitHub API
#[derive(Debug, Deserialize)]
struct LabelResponse {
    name: String,
}

#[derive(Debug, Serialize)]
struct AddLabelsRequest<'a> {
    labels: [&'a str; 1],
}

/// Issue tracker backed by the GitHub REST API
#[derive(Debug, Clone)]
pub struct GitHubTracker {
    client: reqwest::Client,
    token: String,
    api_url: Url,
}

impl GitHubTracker {
    /// Create a client for the API at `api_url` authenticated with `token`
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the HTTP client cannot be
    /// created.
    pub fn new(token: &str, api_url: &str) -> Result<Self> {
        let api_url =
            Url::parse(api_url).with_context(|| format!("Invalid GitHub API URL: {api_url}"))?;
        if api_url.cannot_be_a_base() {
            anyhow::bail!("Invalid GitHub API URL: {api_url}");
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("version-labeler/", env!("CARGO_PKG_VERSION"))),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            token: token.to_string(),
            api_url,
        })
    }

    /// Build an API URL from path segments, percent-encoding each segment
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn issue_endpoint(&self, issue: &IssueRef, rest: &[&str]) -> Url {
        let number = issue.number.to_string();
        let mut segments = vec![
            "repos",
            issue.owner.as_str(),
            issue.repo.as_str(),
            "issues",
            number.as_str(),
        ];
        segments.extend_from_slice(rest);
        self.endpoint(&segments)
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> TrackerResult<Response> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| TrackerError::Transient(format!("{what}: {e}")))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(TrackerError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Transient(format!(
                "{what}: GitHub API error: {status} - {body}"
            )));
        }

        Ok(response)
    }

    async fn fetch_label_page(
        &self,
        issue: &IssueRef,
        page: usize,
    ) -> TrackerResult<Vec<LabelResponse>> {
        let url = self.issue_endpoint(issue, &["labels"]);
        let request = self.client.get(url).query(&[
            ("per_page", PAGE_SIZE.to_string()),
            ("page", page.to_string()),
        ]);

        let what = format!("labels of {issue}");
        self.send(request, &what)
            .await?
            .json()
            .await
            .map_err(|e| TrackerError::Transient(format!("Failed to parse {what}: {e}")))
    }
}

#[async_trait]
impl IssueTracker for GitHubTracker {
    async fn get_issue(&self, issue: &IssueRef) -> TrackerResult<Issue> {
        debug!(%issue, "Fetching issue");
        let what = format!("issue {issue}");
        let request = self.client.get(self.issue_endpoint(issue, &[]));

        self.send(request, &what)
            .await?
            .json()
            .await
            .map_err(|e| TrackerError::Transient(format!("Failed to parse {what}: {e}")))
    }

    async fn list_labels(&self, issue: &IssueRef) -> TrackerResult<Vec<String>> {
        let mut names = Vec::new();
        let mut page = 1;

        loop {
            let labels = self.fetch_label_page(issue, page).await?;
            let count = labels.len();
            names.extend(labels.into_iter().map(|label| label.name));

            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        debug!(%issue, count = names.len(), "Listed issue labels");
        Ok(names)
    }

    async fn label_exists(&self, issue: &IssueRef, name: &str) -> TrackerResult<bool> {
        let url = self.endpoint(&[
            "repos",
            issue.owner.as_str(),
            issue.repo.as_str(),
            "labels",
            name,
        ]);
        let what = format!("label '{name}' in {}/{}", issue.owner, issue.repo);

        match self.send(self.client.get(url), &what).await {
            Ok(_) => Ok(true),
            Err(TrackerError::NotFound(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn add_label(&self, issue: &IssueRef, name: &str) -> TrackerResult<()> {
        debug!(%issue, label = name, "Adding label");
        let request = self
            .client
            .post(self.issue_endpoint(issue, &["labels"]))
            .json(&AddLabelsRequest { labels: [name] });

        self.send(request, &format!("adding label '{name}' to {issue}"))
            .await
            .map(|_| ())
    }

    async fn remove_label(&self, issue: &IssueRef, name: &str) -> TrackerResult<()> {
        debug!(%issue, label = name, "Removing label");
        let request = self
            .client
            .delete(self.issue_endpoint(issue, &["labels", name]));

        self.send(request, &format!("label '{name}' on {issue}"))
            .await
            .map(|_| ())
    }
}
