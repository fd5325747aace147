//! Version label reconciliation
//!
//! An issue carries at most one version label: `Version: <semver>` for the
//! version found in its body, or `Version: unspecified` when there is none.
//! Planning is pure; [`apply_plan`] performs the mutations.

pub mod apply;

pub use apply::{apply_plan, AddOutcome, ReconcileReport, RemovalOutcome};

use serde::Serialize;

/// Prefix shared by every version label
pub const VERSION_LABEL_PREFIX: &str = "Version: ";

/// Label applied when the body declares no version
pub const NO_VERSION_LABEL: &str = "Version: unspecified";

/// Label that should be on the issue for `version`
pub fn target_label(version: Option<&str>) -> String {
    match version {
        Some(version) if !version.is_empty() => format!("{VERSION_LABEL_PREFIX}{version}"),
        _ => NO_VERSION_LABEL.to_string(),
    }
}

/// Whether `label` is a version label
pub fn is_version_label(label: &str) -> bool {
    label.starts_with(VERSION_LABEL_PREFIX)
}

/// Label mutations needed to bring an issue in line with its body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelPlan {
    /// The version label the issue should carry
    pub target: String,

    /// Stale version labels to remove, in their current order
    pub removals: Vec<String>,

    /// Whether `target` still has to be applied
    pub add: bool,
}

impl LabelPlan {
    /// True when the issue already has exactly the right version label
    pub fn is_noop(&self) -> bool {
        self.removals.is_empty() && !self.add
    }
}

/// Compute the label mutations for `version` given the issue's `current` labels
pub fn plan_labels(version: Option<&str>, current: &[String]) -> LabelPlan {
    let target = target_label(version);

    let mut removals: Vec<String> = Vec::new();
    for label in current {
        if is_version_label(label) && *label != target && !removals.contains(label) {
            removals.push(label.clone());
        }
    }

    let add = !current.iter().any(|label| *label == target);

    LabelPlan {
        target,
        removals,
        add,
    }
}
