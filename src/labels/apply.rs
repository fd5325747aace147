//! Applying a label plan to the tracker
//!
//! Removals are independent of each other and run concurrently; each outcome
//! is recorded and one failure never prevents the others from being tried.
//! The addition runs once all removals have been attempted.

use super::LabelPlan;
use crate::models::IssueRef;
use crate::tracker::{IssueTracker, TrackerError};
use futures::future::join_all;
use tracing::{debug, info, warn};

/// Result of removing one stale version label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalOutcome {
    pub label: String,
    pub result: Result<(), TrackerError>,
}

impl RemovalOutcome {
    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Result of applying the target label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// The issue already carried the label
    AlreadyPresent,

    /// The label was applied
    Added,

    /// The label is not registered in the repository, so it was not applied
    Unregistered,

    /// The existence check or the addition failed
    Failed(TrackerError),
}

/// Everything that happened while applying a [`LabelPlan`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub target: String,
    pub removals: Vec<RemovalOutcome>,
    pub addition: AddOutcome,
}

impl ReconcileReport {
    pub fn failed_removals(&self) -> impl Iterator<Item = &RemovalOutcome> {
        self.removals.iter().filter(|outcome| outcome.is_failure())
    }

    /// True when any mutation failed. An unregistered target label is only
    /// a warning.
    pub fn has_failures(&self) -> bool {
        self.failed_removals().next().is_some() || matches!(self.addition, AddOutcome::Failed(_))
    }
}

/// Apply `plan` to `issue`
pub async fn apply_plan<T>(tracker: &T, issue: &IssueRef, plan: &LabelPlan) -> ReconcileReport
where
    T: IssueTracker + ?Sized,
{
    let removals = join_all(
        plan.removals
            .iter()
            .map(|label| remove_stale_label(tracker, issue, label)),
    )
    .await;

    let addition = if plan.add {
        add_target_label(tracker, issue, &plan.target).await
    } else {
        debug!(%issue, label = %plan.target, "Label already present");
        AddOutcome::AlreadyPresent
    };

    ReconcileReport {
        target: plan.target.clone(),
        removals,
        addition,
    }
}

async fn remove_stale_label<T>(tracker: &T, issue: &IssueRef, label: &str) -> RemovalOutcome
where
    T: IssueTracker + ?Sized,
{
    let result = match tracker.remove_label(issue, label).await {
        Ok(()) => {
            info!(%issue, label, "Removed stale version label");
            Ok(())
        }
        Err(TrackerError::NotFound(_)) => {
            debug!(%issue, label, "Label was already gone");
            Ok(())
        }
        Err(e) => {
            warn!(%issue, label, error = %e, "Failed to remove version label");
            Err(e)
        }
    };

    RemovalOutcome {
        label: label.to_string(),
        result,
    }
}

async fn add_target_label<T>(tracker: &T, issue: &IssueRef, label: &str) -> AddOutcome
where
    T: IssueTracker + ?Sized,
{
    match tracker.label_exists(issue, label).await {
        Ok(true) => {}
        Ok(false) | Err(TrackerError::NotFound(_)) => {
            warn!(%issue, label, "Label doesn't seem to exist");
            return AddOutcome::Unregistered;
        }
        Err(e) => {
            warn!(%issue, label, error = %e, "Failed to look up label");
            return AddOutcome::Failed(e);
        }
    }

    match tracker.add_label(issue, label).await {
        Ok(()) => {
            info!(%issue, label, "Applied version label");
            AddOutcome::Added
        }
        Err(e) => {
            warn!(%issue, label, error = %e, "Failed to add version label");
            AddOutcome::Failed(e)
        }
    }
}
