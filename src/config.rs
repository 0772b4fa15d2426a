//! Global configuration parsing, validation, and credential loading.

use std::env;
use std::fs;
use std::path::Path;

use chrono::Duration;
use reqwest::RequestBuilder;
use serde::Deserialize;
use tracing::warn;

use crate::classifier::Thresholds;
use crate::models::vacation::{parse_vacation_list, VacationWindow};
use crate::{AppError, Result};

/// Keyring service under which credentials are looked up.
pub const KEYRING_SERVICE: &str = "pr-shepherd";

/// Upper bound for either staleness threshold (ten years).
const MAX_AGE_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;

/// GitHub credentials applied to every API request.
///
/// Loaded at runtime from the OS keychain or environment variables, never
/// from the TOML file.
#[derive(Clone, PartialEq, Eq)]
pub enum GitHubAuth {
    /// Personal access or installation token (`Authorization: token ...`).
    Token(String),
    /// HTTP basic authentication.
    Basic {
        /// Account name.
        user: String,
        /// Account password.
        password: String,
    },
}

impl GitHubAuth {
    /// Attach these credentials to an outgoing request.
    #[must_use]
    pub fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Token(token) => request.header("Authorization", format!("token {token}")),
            Self::Basic { user, password } => request.basic_auth(user, Some(password)),
        }
    }
}

impl std::fmt::Debug for GitHubAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Token(_) => f.write_str("Token(..)"),
            Self::Basic { user, .. } => f
                .debug_struct("Basic")
                .field("user", user)
                .finish_non_exhaustive(),
        }
    }
}

/// Slack incoming-webhook settings for reminders.
///
/// The webhook URL is a secret and is loaded at runtime; when it is absent
/// reminders are disabled.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SlackConfig {
    /// Display name of the posting bot.
    #[serde(default = "default_slack_username")]
    pub username: String,
    /// Emoji used as the bot avatar.
    #[serde(default = "default_icon_emoji")]
    pub icon_emoji: String,
    /// Incoming webhook URL (populated at runtime).
    #[serde(skip)]
    pub webhook_url: String,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            username: default_slack_username(),
            icon_emoji: default_icon_emoji(),
            webhook_url: String::new(),
        }
    }
}

fn default_slack_username() -> String {
    "github-pr".into()
}

fn default_icon_emoji() -> String {
    ":octocat:".into()
}

fn default_api_url() -> String {
    "https://api.github.com".into()
}

fn default_assign_after_seconds() -> u64 {
    24 * 60 * 60
}

fn default_remind_after_seconds() -> u64 {
    3 * 24 * 60 * 60
}

/// Global configuration parsed from `config.toml`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct GlobalConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Organization whose pull requests are scanned.
    pub organization: String,
    /// Team whose members are eligible reviewers; whole org when absent.
    #[serde(default)]
    pub team_id: Option<String>,
    /// Restrict the scan to one repository of the organization.
    #[serde(default)]
    pub repository: Option<String>,
    /// Login of the automation account; never assigned.
    pub bot_login: String,
    /// Age after which an unassigned pull request gets a reviewer.
    #[serde(default = "default_assign_after_seconds")]
    pub assign_after_seconds: u64,
    /// Age after which the assignee of a pull request is reminded.
    #[serde(default = "default_remind_after_seconds")]
    pub remind_after_seconds: u64,
    /// Comma-separated `login:YYYY-MM-DD:YYYY-MM-DD` entries.
    #[serde(default)]
    pub vacation: String,
    /// Reminder webhook settings.
    #[serde(default)]
    pub slack: SlackConfig,
}

impl GlobalConfig {
    /// Load and validate configuration from a TOML file path.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the file cannot be read or contains
    /// invalid TOML, or if validation fails.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|err| AppError::Config(format!("failed to read config: {err}")))?;
        Self::from_toml_str(&raw)
    }

    /// Parse configuration from a TOML string and validate it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if parsing or validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the Slack webhook URL from OS keychain or `SLACK_WEBHOOK_URL`.
    ///
    /// A missing URL is not an error; it leaves reminders disabled.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` only if the keychain task itself fails.
    pub async fn load_slack_webhook(&mut self) -> Result<()> {
        self.slack.webhook_url = load_credential("slack_webhook_url", "SLACK_WEBHOOK_URL")
            .await?
            .unwrap_or_default();
        Ok(())
    }

    /// Whether a reminder channel is configured.
    #[must_use]
    pub fn reminders_enabled(&self) -> bool {
        !self.slack.webhook_url.is_empty()
    }

    /// Staleness thresholds derived from the configured ages.
    #[must_use]
    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            assign_after: seconds(self.assign_after_seconds),
            remind_after: seconds(self.remind_after_seconds),
        }
    }

    /// Parsed vacation windows; malformed entries are skipped.
    #[must_use]
    pub fn vacation_windows(&self) -> Vec<VacationWindow> {
        parse_vacation_list(&self.vacation)
    }

    fn validate(&mut self) -> Result<()> {
        self.api_url = self.api_url.trim_end_matches('/').to_owned();
        if self.api_url.is_empty() {
            return Err(AppError::Config("api_url must not be empty".into()));
        }

        if self.organization.trim().is_empty() {
            return Err(AppError::Config("organization must not be empty".into()));
        }

        if self.bot_login.trim().is_empty() {
            return Err(AppError::Config("bot_login must not be empty".into()));
        }

        if self.assign_after_seconds == 0 || self.remind_after_seconds == 0 {
            return Err(AppError::Config(
                "assign_after_seconds and remind_after_seconds must be greater than zero".into(),
            ));
        }

        if self.assign_after_seconds > MAX_AGE_SECONDS || self.remind_after_seconds > MAX_AGE_SECONDS
        {
            return Err(AppError::Config(format!(
                "staleness thresholds must not exceed {MAX_AGE_SECONDS} seconds"
            )));
        }

        if self.remind_after_seconds < self.assign_after_seconds {
            warn!(
                assign_after_seconds = self.assign_after_seconds,
                remind_after_seconds = self.remind_after_seconds,
                "reminders fire before assignment age; check thresholds"
            );
        }

        if self.team_id.as_deref().is_some_and(|id| id.trim().is_empty()) {
            self.team_id = None;
        }
        if self.repository.as_deref().is_some_and(|repo| repo.trim().is_empty()) {
            self.repository = None;
        }

        Ok(())
    }
}

/// Load GitHub credentials from OS keychain with env-var fallback.
///
/// Token sources, in order: keyring `pr-shepherd/github_token`, then
/// `GITHUB_TOKEN`. Without a token, `GITHUB_USER` and `GITHUB_PASSWORD`
/// are used for basic authentication.
///
/// # Errors
///
/// Returns `AppError::Config` if no source provides credentials.
pub async fn load_github_auth() -> Result<GitHubAuth> {
    if let Some(token) = load_credential("github_token", "GITHUB_TOKEN").await? {
        return Ok(GitHubAuth::Token(token));
    }

    match (non_empty_env("GITHUB_USER"), non_empty_env("GITHUB_PASSWORD")) {
        (Some(user), Some(password)) => Ok(GitHubAuth::Basic { user, password }),
        _ => Err(AppError::Config(format!(
            "github credentials not found in keychain service {KEYRING_SERVICE}, \
             GITHUB_TOKEN, or GITHUB_USER/GITHUB_PASSWORD env vars"
        ))),
    }
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value.min(MAX_AGE_SECONDS)).unwrap_or_default())
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

/// Load a single credential from OS keychain with env-var fallback.
///
/// Returns `Ok(None)` when neither source has a non-empty value.
async fn load_credential(keyring_key: &str, env_key: &str) -> Result<Option<String>> {
    let key = keyring_key.to_owned();

    // keyring is synchronous I/O.
    let keychain_result = tokio::task::spawn_blocking(move || {
        keyring::Entry::new(KEYRING_SERVICE, &key).and_then(|entry| entry.get_password())
    })
    .await
    .map_err(|err| AppError::Config(format!("keychain task panicked: {err}")))?;

    match keychain_result {
        Ok(value) if !value.is_empty() => return Ok(Some(value)),
        Ok(_) => {
            warn!(key = keyring_key, "keychain entry is empty, trying env var");
        }
        Err(err) => {
            tracing::debug!(
                key = keyring_key,
                ?err,
                "keychain lookup failed, trying env var"
            );
        }
    }

    Ok(non_empty_env(env_key))
}
