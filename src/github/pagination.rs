//! `Link`-header pagination over GitHub collection endpoints.
//!
//! [`pages`] turns a starting request into a lazy stream of pages; the
//! stream ends as soon as a response carries no `rel="next"` link.
//! [`collect_pages`] drains it fail-fast.

use std::sync::OnceLock;

use futures_util::stream::{self, Stream, TryStreamExt};
use regex::Regex;
use reqwest::header::LINK;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GitHubAuth;
use crate::{AppError, Result};

/// Extract the `rel="next"` target from a `Link` header value.
#[must_use]
#[allow(clippy::expect_used)]
pub fn next_page_url(link_header: &str) -> Option<String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r#"<([^>]+)>\s*;\s*rel="next""#).expect("valid link header regex")
    });
    pattern
        .captures(link_header)
        .map(|caps| caps[1].to_owned())
}

/// Authenticated starting point of a paged listing.
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Shared HTTP client.
    pub client: Client,
    /// Credentials applied to every page request.
    pub auth: GitHubAuth,
    /// URL of the first page.
    pub url: String,
    /// Short label used in errors and logs (e.g. `list_items`).
    pub operation: &'static str,
}

/// Lazily fetch pages starting at `request.url`.
///
/// Each stream element is one decoded page. An error ends the stream.
pub fn pages<T>(request: PageRequest) -> impl Stream<Item = Result<Vec<T>>>
where
    T: DeserializeOwned,
{
    let PageRequest {
        client,
        auth,
        url,
        operation,
    } = request;

    stream::try_unfold(Some(url), move |next| {
        let client = client.clone();
        let auth = auth.clone();
        async move {
            let Some(url) = next else {
                return Ok(None);
            };
            let (page, next) = fetch_page::<T>(&client, &auth, &url, operation).await?;
            debug!(operation, url = %url, count = page.len(), has_next = next.is_some(), "fetched page");
            Ok(Some((page, next)))
        }
    })
}

/// Fetch every page and concatenate them in page order.
///
/// # Errors
///
/// Returns the first transport, status, or decode failure. Pages fetched
/// before the failure are discarded.
pub async fn collect_pages<T>(request: PageRequest) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    pages(request).try_concat().await
}

async fn fetch_page<T>(
    client: &Client,
    auth: &GitHubAuth,
    url: &str,
    operation: &'static str,
) -> Result<(Vec<T>, Option<String>)>
where
    T: DeserializeOwned,
{
    let resp = auth
        .apply(client.get(url))
        .send()
        .await
        .map_err(|err| AppError::Http(format!("{operation} GET {url} failed: {err}")))?;

    let status = resp.status();
    let next = resp
        .headers()
        .get(LINK)
        .and_then(|value| value.to_str().ok())
        .and_then(next_page_url);

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(AppError::UnexpectedStatus {
            operation,
            status: status.as_u16(),
            body,
        });
    }

    let text = resp.text().await?;
    let page: Vec<T> = serde_json::from_str(&text)
        .map_err(|err| AppError::Decode(format!("{operation} GET {url}: {err}")))?;
    Ok((page, next))
}
