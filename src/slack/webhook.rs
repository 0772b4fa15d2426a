//! Slack incoming-webhook notifier.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::info;

use crate::config::SlackConfig;
use crate::models::Item;
use crate::slack::Notifier;
use crate::{AppError, Result};

/// JSON payload accepted by Slack incoming webhooks.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WebhookMessage {
    /// Bot display name.
    pub username: String,
    /// Bot avatar emoji.
    pub icon_emoji: String,
    /// Message text in Slack mrkdwn.
    pub text: String,
}

/// Reminder text for an assigned pull request.
///
/// GitHub logins are not necessarily Slack handles; the mention is a best
/// effort. Without an assignee nobody is mentioned.
#[must_use]
pub fn reminder_text(item: &Item) -> String {
    let link = format!(
        "<{}|Pull Request #{}> ({})",
        item.html_url, item.number, item.title
    );
    match &item.assignee {
        Some(assignee) => format!("@{}, please work on {link}", assignee.login),
        None => format!("Please work on {link}"),
    }
}

/// Posts reminders to a Slack incoming webhook.
#[derive(Debug, Clone)]
pub struct SlackWebhook {
    http: Client,
    url: String,
    username: String,
    icon_emoji: String,
}

impl SlackWebhook {
    /// Build a notifier from the Slack section of the configuration.
    ///
    /// An empty `webhook_url` yields a notifier whose every call returns
    /// `AppError::NotSupported`.
    #[must_use]
    pub fn new(config: &SlackConfig) -> Self {
        Self {
            http: Client::new(),
            url: config.webhook_url.clone(),
            username: config.username.clone(),
            icon_emoji: config.icon_emoji.clone(),
        }
    }

    /// Whether a webhook URL is configured.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }

    /// Build the payload for `item`.
    #[must_use]
    pub fn message_for(&self, item: &Item) -> WebhookMessage {
        WebhookMessage {
            username: self.username.clone(),
            icon_emoji: self.icon_emoji.clone(),
            text: reminder_text(item),
        }
    }

    async fn post(&self, item: &Item) -> Result<()> {
        if !self.is_configured() {
            return Err(AppError::NotSupported("slack webhook url not configured".into()));
        }

        let assignee = item.assignee.as_ref().map_or("", |a| a.login.as_str());
        info!(assignee, number = item.number, title = %item.title, "sending reminder");

        let resp = self
            .http
            .post(&self.url)
            .json(&self.message_for(item))
            .send()
            .await
            .map_err(|err| AppError::Http(format!("slack webhook POST failed: {err}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            return Err(AppError::UnexpectedStatus {
                operation: "remind",
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

impl Notifier for SlackWebhook {
    fn remind<'a>(
        &'a self,
        item: &'a Item,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.post(item))
    }
}
