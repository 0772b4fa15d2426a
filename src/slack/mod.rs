//! Reminder notifications.
//!
//! [`Notifier`] is the seam the dispatcher uses for the reminder path;
//! [`webhook::SlackWebhook`] posts to a Slack incoming webhook.

pub mod webhook;

use std::future::Future;
use std::pin::Pin;

use crate::models::Item;
use crate::Result;

/// Sends a "please work on this" reminder to an item's assignee.
pub trait Notifier: Send + Sync {
    /// Post a reminder naming the assignee of `item` and linking to it.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotSupported` when no channel is configured,
    /// `AppError::Http` on transport failure, or
    /// `AppError::UnexpectedStatus` when the channel rejects the message.
    fn remind<'a>(
        &'a self,
        item: &'a Item,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}
