//! In-memory issue tracker for integration tests
//!
//! Holds one issue, its labels and the repository's label registry, and
//! records every mutation so tests can assert on what the labeler did.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Mutex;
use version_labeler::tracker::TrackerResult;
use version_labeler::{Issue, IssueRef, IssueState, IssueTracker, TrackerError};

/// A label mutation performed against the fake tracker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Add(String),
    Remove(String),
}

#[derive(Debug, Default)]
struct State {
    labels: Vec<String>,
    mutations: Vec<Mutation>,
}

pub struct FakeTracker {
    issue: Option<Issue>,
    registry: HashSet<String>,
    failing_removals: HashSet<String>,
    fail_add: bool,
    fail_label_lookup: bool,
    state: Mutex<State>,
}

impl FakeTracker {
    pub fn new(body: Option<&str>, labels: &[&str]) -> Self {
        Self {
            issue: Some(Issue {
                state: IssueState::Open,
                body: body.map(str::to_string),
            }),
            registry: HashSet::new(),
            failing_removals: HashSet::new(),
            fail_add: false,
            fail_label_lookup: false,
            state: Mutex::new(State {
                labels: labels.iter().map(|label| label.to_string()).collect(),
                mutations: Vec::new(),
            }),
        }
    }

    pub fn missing_issue() -> Self {
        let mut tracker = Self::new(None, &[]);
        tracker.issue = None;
        tracker
    }

    pub fn closed(mut self) -> Self {
        if let Some(issue) = self.issue.as_mut() {
            issue.state = IssueState::Closed;
        }
        self
    }

    /// Register labels in the repository
    pub fn with_registry(mut self, labels: &[&str]) -> Self {
        self.registry
            .extend(labels.iter().map(|label| label.to_string()));
        self
    }

    pub fn failing_removal(mut self, label: &str) -> Self {
        self.failing_removals.insert(label.to_string());
        self
    }

    pub fn failing_add(mut self) -> Self {
        self.fail_add = true;
        self
    }

    pub fn failing_label_lookup(mut self) -> Self {
        self.fail_label_lookup = true;
        self
    }

    pub fn labels(&self) -> Vec<String> {
        self.state.lock().unwrap().labels.clone()
    }

    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().unwrap().mutations.clone()
    }

    pub fn clear_mutations(&self) {
        self.state.lock().unwrap().mutations.clear();
    }
}

pub fn issue_ref() -> IssueRef {
    IssueRef::new("facebook", "react-native", 36712)
}

#[async_trait]
impl IssueTracker for FakeTracker {
    async fn get_issue(&self, issue: &IssueRef) -> TrackerResult<Issue> {
        self.issue
            .clone()
            .ok_or_else(|| TrackerError::NotFound(format!("issue {issue}")))
    }

    async fn list_labels(&self, _issue: &IssueRef) -> TrackerResult<Vec<String>> {
        Ok(self.labels())
    }

    async fn label_exists(&self, _issue: &IssueRef, name: &str) -> TrackerResult<bool> {
        if self.fail_label_lookup {
            return Err(TrackerError::Transient("502 Bad Gateway".to_string()));
        }
        Ok(self.registry.contains(name))
    }

    async fn add_label(&self, _issue: &IssueRef, name: &str) -> TrackerResult<()> {
        if self.fail_add {
            return Err(TrackerError::Transient("503 Service Unavailable".to_string()));
        }

        let mut state = self.state.lock().unwrap();
        state.mutations.push(Mutation::Add(name.to_string()));
        if !state.labels.iter().any(|label| label == name) {
            state.labels.push(name.to_string());
        }
        Ok(())
    }

    async fn remove_label(&self, _issue: &IssueRef, name: &str) -> TrackerResult<()> {
        if self.failing_removals.contains(name) {
            return Err(TrackerError::Transient(format!("failed to remove {name}")));
        }

        let mut state = self.state.lock().unwrap();
        if !state.labels.iter().any(|label| label == name) {
            return Err(TrackerError::NotFound(format!("label {name}")));
        }
        state.mutations.push(Mutation::Remove(name.to_string()));
        state.labels.retain(|label| label != name);
        Ok(())
    }
}
