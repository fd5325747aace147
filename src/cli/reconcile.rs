//! Reconcile command: keep an issue's version label in sync with its body

use crate::cli::exit_codes;
use crate::config::{Config, ConfigSource};
use crate::extractor::VersionExtractor;
use crate::labels::{apply_plan, plan_labels, AddOutcome, LabelPlan, ReconcileReport};
use crate::models::IssueRef;
use crate::tracker::{GitHubTracker, IssueTracker};
use crate::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// GitHub token used to read the issue and edit its labels
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Only issues carrying this label are processed
    #[arg(long, env = "INPUT_REQUIRED-LABEL")]
    required_label: Option<String>,

    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Issue number (read from the event payload when omitted)
    #[arg(long)]
    issue: Option<u64>,

    /// GitHub Actions event payload
    #[arg(long, env = "GITHUB_EVENT_PATH", hide = true)]
    event_path: Option<PathBuf>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL")]
    api_url: Option<String>,

    /// Compute the label changes without applying them
    #[arg(long)]
    dry_run: bool,
}

impl From<ReconcileArgs> for ConfigSource {
    fn from(args: ReconcileArgs) -> Self {
        ConfigSource {
            github_token: args.github_token,
            required_label: args.required_label,
            repository: args.repository,
            issue: args.issue,
            event_path: args.event_path,
            api_url: args.api_url,
        }
    }
}

/// Why a run ended without touching any label
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Closed,
    NoBody,
    MissingRequiredLabel(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Closed => write!(f, "issue already closed"),
            SkipReason::NoBody => write!(f, "no description provided"),
            SkipReason::MissingRequiredLabel(label) => {
                write!(f, "issue not tagged with '{label}'")
            }
        }
    }
}

/// Result of one reconciliation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Skipped(SkipReason),
    DryRun {
        version: Option<String>,
        plan: LabelPlan,
    },
    Reconciled {
        version: Option<String>,
        report: ReconcileReport,
    },
}

impl RunOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            RunOutcome::Reconciled { report, .. } if report.has_failures() => {
                exit_codes::MUTATION_FAILED
            }
            _ => exit_codes::SUCCESS,
        }
    }
}

/// Reconcile the version label of `issue`
///
/// Tracker failures while reading the issue or its labels abort the run.
/// Failures while changing labels are recorded in the report instead.
pub async fn execute<T>(
    tracker: &T,
    issue: &IssueRef,
    required_label: &str,
    dry_run: bool,
) -> Result<RunOutcome>
where
    T: IssueTracker + ?Sized,
{
    let extractor = VersionExtractor::new()?;

    // Fetched fresh: earlier steps of the workflow may have edited the issue
    let current = tracker
        .get_issue(issue)
        .await
        .with_context(|| format!("Failed to fetch issue {issue}"))?;

    if current.is_closed() {
        debug!(%issue, "Issue already closed");
        return Ok(RunOutcome::Skipped(SkipReason::Closed));
    }

    let Some(body) = current.body_text() else {
        debug!(%issue, "No description provided");
        return Ok(RunOutcome::Skipped(SkipReason::NoBody));
    };

    let version = extractor.extract_from_body(body);
    info!(%issue, version = version.as_deref().unwrap_or(""), "Extracted version");

    let labels = tracker
        .list_labels(issue)
        .await
        .with_context(|| format!("Failed to list labels of {issue}"))?;

    if !labels.iter().any(|label| label == required_label) {
        debug!(%issue, required_label, "Issue not tagged with the required label");
        return Ok(RunOutcome::Skipped(SkipReason::MissingRequiredLabel(
            required_label.to_string(),
        )));
    }

    let plan = plan_labels(version.as_deref(), &labels);
    debug!(%issue, ?plan, "Planned label changes");

    if dry_run {
        return Ok(RunOutcome::DryRun { version, plan });
    }

    let report = apply_plan(tracker, issue, &plan).await;
    Ok(RunOutcome::Reconciled { version, report })
}

/// Run the reconcile command and return the process exit code
pub async fn run(args: ReconcileArgs) -> Result<u8> {
    let dry_run = args.dry_run;
    let config = Config::resolve(ConfigSource::from(args).with_env_fallbacks())?;
    let tracker = GitHubTracker::new(&config.token, &config.api_url)?;

    let outcome = execute(&tracker, &config.issue, &config.required_label, dry_run).await?;
    print_outcome(&config.issue, &outcome);
    Ok(outcome.exit_code())
}

fn print_outcome(issue: &IssueRef, outcome: &RunOutcome) {
    match outcome {
        RunOutcome::Skipped(reason) => {
            println!("{}", format!("⏭️  Skipped {issue}: {reason}").yellow());
        }
        RunOutcome::DryRun { version, plan } => {
            println!("{}", format!("🔍 Dry run for {issue}").cyan());
            println!("   Version: {}", version.as_deref().unwrap_or("(none)"));
            println!("   Target label: {}", plan.target.green());
            for label in &plan.removals {
                println!("   Would remove: {}", label.red());
            }
            if plan.add {
                println!("   Would add: {}", plan.target.green());
            }
            if plan.is_noop() {
                println!("   {}", "Labels already up to date".green());
            }
        }
        RunOutcome::Reconciled { report, .. } => print_report(issue, report),
    }
}

fn print_report(issue: &IssueRef, report: &ReconcileReport) {
    for outcome in &report.removals {
        match &outcome.result {
            Ok(()) => println!("   Removed: {}", outcome.label),
            Err(e) => println!(
                "{}",
                format!("   ❌ Failed to remove {}: {e}", outcome.label).red()
            ),
        }
    }

    match &report.addition {
        AddOutcome::Added => println!("   Added: {}", report.target.green()),
        AddOutcome::AlreadyPresent => {}
        AddOutcome::Unregistered => println!(
            "{}",
            format!("   ⚠️  Label {} doesn't seem to exist", report.target).yellow()
        ),
        AddOutcome::Failed(e) => println!(
            "{}",
            format!("   ❌ Failed to add {}: {e}", report.target).red()
        ),
    }

    if report.has_failures() {
        println!(
            "{}",
            format!("❌ Failed to update version labels on {issue}").red().bold()
        );
    } else {
        println!("{}", format!("✅ {issue} labeled {}", report.target).green());
    }
}
