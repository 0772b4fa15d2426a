#![forbid(unsafe_code)]

//! `pr-shepherd` batch job binary.
//!
//! Loads configuration and credentials, then performs one scan of the
//! organization's open pull requests. Intended to be run from a scheduler.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use pr_shepherd::config::{load_github_auth, GlobalConfig};
use pr_shepherd::github::client::GitHubClient;
use pr_shepherd::orchestrator::{Run, RunSettings};
use pr_shepherd::slack::webhook::SlackWebhook;
use pr_shepherd::slack::Notifier;
use pr_shepherd::{AppError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "pr-shepherd", about = "Assign reviewers to stale pull requests", version, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long)]
    config: PathBuf,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    /// Override the organization from the config file.
    #[arg(long)]
    organization: Option<String>,

    /// Override the reviewer team id from the config file.
    #[arg(long)]
    team_id: Option<String>,

    /// Override the vacation list, e.g. `alice:2024-05-01:2024-05-12,bob:...`.
    #[arg(long)]
    vacation: Option<String>,
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.log_format)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::Config(format!("failed to build tokio runtime: {err}")))?
        .block_on(run(args))
}

async fn run(args: Cli) -> Result<()> {
    // ── Load configuration ──────────────────────────────
    let mut config = GlobalConfig::load_from_path(&args.config)?;

    if let Some(org) = args.organization.filter(|org| !org.trim().is_empty()) {
        config.organization = org;
    }
    if let Some(team) = args.team_id {
        config.team_id = Some(team).filter(|team| !team.trim().is_empty());
    }
    if let Some(vacation) = args.vacation {
        config.vacation = vacation;
    }

    let auth = load_github_auth().await?;
    config.load_slack_webhook().await?;
    info!(
        organization = %config.organization,
        team_id = config.team_id.as_deref().unwrap_or("-"),
        reminders = config.reminders_enabled(),
        "configuration loaded"
    );

    // ── Wire collaborators ──────────────────────────────
    let tracker = Arc::new(GitHubClient::from_config(&config, auth)?);
    let notifier: Option<Arc<dyn Notifier>> = if config.reminders_enabled() {
        Some(Arc::new(SlackWebhook::new(&config.slack)))
    } else {
        warn!("slack webhook not configured; reminders disabled");
        None
    };

    // ── Execute one batch run ───────────────────────────
    let settings = RunSettings::from_config(&config, Utc::now());
    let summary = Run::new(tracker, notifier, settings).execute().await?;

    info!(
        run_id = %summary.run_id,
        fetched = summary.fetched,
        assigned = summary.report.assigned,
        reminded = summary.report.reminded,
        "pr-shepherd finished"
    );
    Ok(())
}

fn init_tracing(log_format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = fmt().with_env_filter(env_filter);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| AppError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
