//! Main workflow orchestration logic
//!
//! Runs the release pipeline once: locate the latest tag, walk history to
//! it, classify the commits, compute the next version, compose the notes,
//! and publish when the trigger allows it. Warnings are handed to the
//! caller's reporter as soon as the stage producing them completes, so they
//! reach the log even when a later stage fails. Output and exit handling
//! stay in `main.rs`.

use std::sync::Arc;

use tracing::info;

use crate::analyzer::BumpClassifier;
use crate::boundary::BoundaryWarning;
use crate::ci::RunContext;
use crate::config::Config;
use crate::domain::{version, PullRequestSet, ReleaseDraft, Tag, VersionBump};
use crate::error::Result;
use crate::host::{ReleaseRecord, SourceHost};
use crate::release::{compose_release_body, HistoryWalker, ReleasePublisher, TagLocator};

/// Arguments for the release workflow
///
/// Decoupled from the clap arguments so the workflow can be driven
/// programmatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseWorkflowArgs {
    /// Compute everything but never create the release
    pub dry_run: bool,
}

/// Receives each non-fatal warning as soon as its stage completes
pub type WarningReporter<'a> = &'a (dyn Fn(&BoundaryWarning) + Sync);

/// Everything computed before publication
#[derive(Debug, Clone)]
pub struct ReleasePlan {
    pub previous_tag: Option<Tag>,
    /// Walked commit messages, head first
    pub messages: Vec<String>,
    pub pull_requests: PullRequestSet,
    pub bump: VersionBump,
    pub draft: ReleaseDraft,
    pub warnings: Vec<BoundaryWarning>,
}

/// Result of a workflow run
#[derive(Debug, Clone)]
pub struct WorkflowResult {
    pub plan: ReleasePlan,
    /// Set only when a release was created
    pub published: Option<ReleaseRecord>,
    /// Why publication was skipped, when it was
    pub skipped_reason: Option<String>,
}

/// Compute the next release without publishing it.
pub async fn plan_release(
    host: Arc<dyn SourceHost>,
    context: &RunContext,
    config: &Config,
    report: WarningReporter<'_>,
) -> Result<ReleasePlan> {
    let location = TagLocator::new(Arc::clone(&host), config).locate().await?;
    location.warnings.iter().for_each(report);
    let previous_tag = location.tag;

    let head = host.get_commit(context.head_ref()).await?;
    info!(head = %head.sha, reference = %context.head_ref(), "head resolved");

    let walk = HistoryWalker::new(Arc::clone(&host), config)
        .walk(&head.sha, previous_tag.as_ref())
        .await?;
    walk.warnings.iter().for_each(report);

    let bump = BumpClassifier::new(&config.classifier).classify(&walk.messages());
    let prior_name = previous_tag.as_ref().map(|t| t.name.as_str());
    let next = version::next_version(
        prior_name,
        bump,
        &config.tag_pattern(),
        &config.initial_version,
    )?;
    info!(previous = ?prior_name, next = %next, %bump, "version computed");

    let body = compose_release_body(prior_name, &walk.pull_requests);
    let messages = walk.commits.into_iter().map(|c| c.message).collect();
    let mut warnings = location.warnings;
    warnings.extend(walk.warnings);

    Ok(ReleasePlan {
        previous_tag,
        messages,
        pull_requests: walk.pull_requests,
        bump,
        draft: ReleaseDraft::new(next, body, head.sha),
        warnings,
    })
}

/// Main release workflow
///
/// Publication is the last step and happens only for a push to a release
/// branch outside dry-run mode; any earlier failure returns before it.
pub async fn run_release_workflow(
    host: Arc<dyn SourceHost>,
    context: &RunContext,
    config: &Config,
    args: &ReleaseWorkflowArgs,
    report: WarningReporter<'_>,
) -> Result<WorkflowResult> {
    let plan = plan_release(Arc::clone(&host), context, config, report).await?;

    let skipped_reason = if args.dry_run {
        Some("dry run".to_string())
    } else if !context.should_publish(config) {
        Some(format!(
            "event '{}' on '{}' is not a push to a release branch",
            context.event_name,
            context.branch(config).name
        ))
    } else {
        None
    };

    let published = match skipped_reason {
        Some(ref reason) => {
            info!(%reason, "publication skipped");
            None
        }
        None => Some(
            ReleasePublisher::new(host, &config.release)
                .publish(&plan.draft)
                .await?,
        ),
    };

    Ok(WorkflowResult {
        plan,
        published,
        skipped_reason,
    })
}
