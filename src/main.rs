use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, Level};

use gh_autorelease::ci::{ActionOutputs, RunContext};
use gh_autorelease::cli::{run_release_workflow, ReleaseWorkflowArgs, WorkflowResult};
use gh_autorelease::config;
use gh_autorelease::host::{RepoSlug, SourceHost};
use gh_autorelease::telemetry::init_tracing;
use gh_autorelease::ui;

#[derive(clap::Parser)]
#[command(
    name = "gh-autorelease",
    version,
    about = "Compute the next semantic version from pull request history and publish a GitHub release"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(
        long,
        env = "INPUT_GITHUB_TOKEN",
        hide_env_values = true,
        help = "Token used to authenticate against the GitHub API (falls back to GITHUB_TOKEN)"
    )]
    token: Option<String>,

    #[arg(long, env = "GITHUB_REPOSITORY", help = "Repository as owner/name")]
    repository: String,

    #[arg(long, env = "GITHUB_EVENT_NAME", help = "Event that triggered the run")]
    event_name: String,

    #[arg(long = "ref", env = "GITHUB_REF", help = "Ref that triggered the run")]
    git_ref: String,

    #[arg(long, env = "GITHUB_SHA", help = "Commit that triggered the run")]
    sha: Option<String>,

    #[arg(long, env = "GITHUB_API_URL", help = "Override the API base URL")]
    api_url: Option<String>,

    #[arg(long, help = "Compute the release without publishing it")]
    dry_run: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    log_json: bool,

    #[arg(short, long, help = "Enable debug logging")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    init_tracing(args.log_json, level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => ui::set_failed(&format!("{:#}", e)),
    }
}

async fn run(args: Args) -> Result<()> {
    // Load configuration
    let config = config::load_config(args.config.as_deref()).context("Error loading config")?;

    let repository = RepoSlug::parse(&args.repository)?;
    let token = args
        .token
        .filter(|t| !t.is_empty())
        .or_else(|| std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()));
    let api_url = args.api_url.unwrap_or_else(|| config.api_url.clone());

    let context = RunContext {
        event_name: args.event_name,
        git_ref: args.git_ref,
        sha: args.sha,
        repository,
        token,
    };
    debug!(?context, "run context");

    let client = context
        .github_client(&api_url)
        .context("Failed to build GitHub client")?;
    let host: Arc<dyn SourceHost> = Arc::new(client);

    let workflow_args = ReleaseWorkflowArgs {
        dry_run: args.dry_run,
    };
    let result = run_release_workflow(
        host,
        &context,
        &config,
        &workflow_args,
        &ui::display_boundary_warning,
    )
    .await?;

    report(&result);

    ActionOutputs::from_env()
        .write_result(&result)
        .context("Failed to write step outputs")?;

    Ok(())
}

fn report(result: &WorkflowResult) {
    let plan = &result.plan;
    let previous = plan.previous_tag.as_ref().map(|t| t.name.as_str());

    let messages: Vec<&str> = plan.messages.iter().map(String::as_str).collect();
    ui::display_commit_analysis(&messages, previous);
    ui::display_release_summary(previous, plan.bump, &plan.draft, &plan.pull_requests);

    match (&result.published, &result.skipped_reason) {
        (Some(record), _) => {
            ui::display_info(&format!("Published {}: {}", plan.draft.version, record.html_url))
        }
        (None, Some(reason)) => ui::display_info(&format!("Release not published: {}", reason)),
        (None, None) => {}
    }
}
