//! REST implementation of [`IssueTracker`] backed by `reqwest`.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Client, StatusCode};
use serde_json::json;
use tracing::{debug, info};

use crate::config::{GitHubAuth, GlobalConfig};
use crate::github::pagination::{collect_pages, PageRequest};
use crate::github::{IssueTracker, TrackerFuture};
use crate::models::{Item, Member};
use crate::{AppError, Result};

const USER_AGENT: &str = concat!("pr-shepherd/", env!("CARGO_PKG_VERSION"));
const PER_PAGE: u32 = 100;

/// Where open items are listed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingScope {
    /// Every open issue the credentials can see in the organization.
    Organization(String),
    /// Open issues of a single repository.
    Repository {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },
}

/// Where eligible reviewers are listed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterScope {
    /// All members of the organization.
    Organization(String),
    /// Members of a team, by numeric team id.
    Team(String),
}

/// GitHub REST client scoped to one organization.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    api_url: String,
    auth: GitHubAuth,
    listing: ListingScope,
    roster: RosterScope,
}

impl GitHubClient {
    /// Build a client for the scopes described by `config`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn from_config(config: &GlobalConfig, auth: GitHubAuth) -> Result<Self> {
        let listing = match &config.repository {
            Some(repo) => ListingScope::Repository {
                owner: config.organization.clone(),
                repo: repo.clone(),
            },
            None => ListingScope::Organization(config.organization.clone()),
        };
        let roster = match &config.team_id {
            Some(team) => RosterScope::Team(team.clone()),
            None => RosterScope::Organization(config.organization.clone()),
        };
        Self::new(&config.api_url, auth, listing, roster)
    }

    /// Build a client with explicit scopes.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if the HTTP client cannot be constructed.
    pub fn new(
        api_url: &str,
        auth: GitHubAuth,
        listing: ListingScope,
        roster: RosterScope,
    ) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .map_err(|err| AppError::Config(format!("failed to build http client: {err}")))?;

        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_owned(),
            auth,
            listing,
            roster,
        })
    }

    /// URL of the first page of open items.
    #[must_use]
    pub fn items_url(&self) -> String {
        match &self.listing {
            ListingScope::Organization(org) => format!(
                "{}/orgs/{org}/issues?filter=all&state=open&per_page={PER_PAGE}",
                self.api_url
            ),
            ListingScope::Repository { owner, repo } => format!(
                "{}/repos/{owner}/{repo}/issues?state=open&per_page={PER_PAGE}",
                self.api_url
            ),
        }
    }

    /// URL of the first page of the roster.
    #[must_use]
    pub fn members_url(&self) -> String {
        match &self.roster {
            RosterScope::Organization(org) => {
                format!("{}/orgs/{org}/members?per_page={PER_PAGE}", self.api_url)
            }
            RosterScope::Team(team) => {
                format!("{}/teams/{team}/members?per_page={PER_PAGE}", self.api_url)
            }
        }
    }

    fn page_request(&self, url: String, operation: &'static str) -> PageRequest {
        PageRequest {
            client: self.http.clone(),
            auth: self.auth.clone(),
            url,
            operation,
        }
    }

    async fn fetch_items(&self) -> Result<Vec<Item>> {
        let items: Vec<Item> =
            collect_pages(self.page_request(self.items_url(), "list_items")).await?;
        info!(count = items.len(), "fetched open items");
        Ok(items)
    }

    async fn fetch_members(&self) -> Result<Vec<Member>> {
        let members: Vec<Member> =
            collect_pages(self.page_request(self.members_url(), "list_members")).await?;
        debug!(count = members.len(), "fetched roster");
        Ok(members)
    }

    async fn patch_assignee(&self, item: &Item, member: &Member) -> Result<()> {
        let locator = item.locator()?;
        let url = locator.issue_url(&self.api_url);
        let resp = self
            .auth
            .apply(self.http.patch(&url))
            .json(&json!({ "assignee": member.login }))
            .send()
            .await
            .map_err(|err| AppError::Http(format!("assign PATCH {url} failed: {err}")))?;
        expect_status(resp, StatusCode::OK, "assign").await?;
        info!(assignee = %member.login, item = %locator, "assigned reviewer");
        Ok(())
    }

    async fn post_comment(&self, item: &Item, body: &str) -> Result<()> {
        let locator = item.locator()?;
        let url = locator.comments_url(&self.api_url);
        let resp = self
            .auth
            .apply(self.http.post(&url))
            .json(&json!({ "body": body }))
            .send()
            .await
            .map_err(|err| AppError::Http(format!("comment POST {url} failed: {err}")))?;
        expect_status(resp, StatusCode::CREATED, "comment").await
    }
}

async fn expect_status(
    resp: reqwest::Response,
    expected: StatusCode,
    operation: &'static str,
) -> Result<()> {
    let status = resp.status();
    if status == expected {
        return Ok(());
    }
    let body = resp.text().await.unwrap_or_default();
    Err(AppError::UnexpectedStatus {
        operation,
        status: status.as_u16(),
        body,
    })
}

impl IssueTracker for GitHubClient {
    fn list_open_items(&self) -> TrackerFuture<'_, Vec<Item>> {
        Box::pin(self.fetch_items())
    }

    fn list_members(&self) -> TrackerFuture<'_, Vec<Member>> {
        Box::pin(self.fetch_members())
    }

    fn assign<'a>(&'a self, item: &'a Item, member: &'a Member) -> TrackerFuture<'a, ()> {
        Box::pin(self.patch_assignee(item, member))
    }

    fn comment<'a>(&'a self, item: &'a Item, body: &'a str) -> TrackerFuture<'a, ()> {
        Box::pin(self.post_comment(item, body))
    }
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("api_url", &self.api_url)
            .field("listing", &self.listing)
            .field("roster", &self.roster)
            .finish_non_exhaustive()
    }
}
