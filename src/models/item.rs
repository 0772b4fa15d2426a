//! Issue / pull request model as returned by the issue listing endpoints.

use std::fmt::{Display, Formatter};
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::member::Member;
use crate::{AppError, Result};

/// Marker object GitHub attaches to issues that are really pull requests.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PullRequestRef {
    /// Browser URL of the pull request.
    #[serde(default)]
    pub html_url: Option<String>,
}

/// An open issue or pull request.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Item {
    /// Global numeric identifier.
    pub id: i64,
    /// Per-repository sequence number (`#n`).
    pub number: u64,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last update instant.
    pub updated_at: DateTime<Utc>,
    /// Author of the item.
    pub user: Member,
    /// Current assignee, if any.
    #[serde(default)]
    pub assignee: Option<Member>,
    /// API URL of the issue resource.
    pub url: String,
    /// Browser URL; also the source of [`ItemLocator`].
    pub html_url: String,
    /// Title as shown on GitHub.
    #[serde(default)]
    pub title: String,
    /// `open` or `closed`.
    #[serde(default)]
    pub state: String,
    /// Present only when the item is a pull request.
    #[serde(default)]
    pub pull_request: Option<PullRequestRef>,
}

impl Item {
    /// Whether this item is a pull request rather than a plain issue.
    #[must_use]
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// Resolve the owner/repo/number triple used to address follow-up writes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Decode` if `html_url` does not look like
    /// `<scheme>://<host>/<owner>/<repo>/...`.
    pub fn locator(&self) -> Result<ItemLocator> {
        let caps = html_url_pattern()
            .captures(&self.html_url)
            .ok_or_else(|| {
                AppError::Decode(format!("unexpected html_url format: {}", self.html_url))
            })?;
        Ok(ItemLocator {
            owner: caps[1].to_owned(),
            repo: caps[2].to_owned(),
            number: self.number,
        })
    }
}

#[allow(clippy::expect_used)]
fn html_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https?://[^/]+/([^/]+)/([^/]+)/").expect("valid html_url regex")
    })
}

/// Address of an item in the REST API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemLocator {
    /// Repository owner (organization or user).
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Issue / pull request number.
    pub number: u64,
}

impl ItemLocator {
    /// `<api>/repos/<owner>/<repo>/issues/<n>`.
    #[must_use]
    pub fn issue_url(&self, api_url: &str) -> String {
        format!(
            "{}/repos/{}/{}/issues/{}",
            api_url.trim_end_matches('/'),
            self.owner,
            self.repo,
            self.number
        )
    }

    /// `<api>/repos/<owner>/<repo>/issues/<n>/comments`.
    #[must_use]
    pub fn comments_url(&self, api_url: &str) -> String {
        format!("{}/comments", self.issue_url(api_url))
    }
}

impl Display for ItemLocator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}
