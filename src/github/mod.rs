//! GitHub issue tracker abstraction.
//!
//! The [`IssueTracker`] trait decouples the assignment engine from the REST
//! transport so the pool, selector, and dispatcher can run against an
//! in-memory tracker in tests. [`client::GitHubClient`] is the production
//! implementation.

pub mod client;
pub mod pagination;

use std::future::Future;
use std::pin::Pin;

use crate::models::{Item, Member};
use crate::Result;

/// Boxed future returned by [`IssueTracker`] methods.
pub type TrackerFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T>> + Send + 'a>>;

/// Read and write access to the issues of one organization.
pub trait IssueTracker: Send + Sync {
    /// Fetch every open issue and pull request across all pages.
    ///
    /// # Errors
    ///
    /// Returns the first page fetch or decode failure; no partial list is
    /// returned.
    fn list_open_items(&self) -> TrackerFuture<'_, Vec<Item>>;

    /// Fetch the full team (or organization) roster.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Http`, `AppError::Decode`, or
    /// `AppError::UnexpectedStatus` if any roster page cannot be read.
    fn list_members(&self) -> TrackerFuture<'_, Vec<Member>>;

    /// Set `member` as the assignee of `item`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedStatus` unless the backend answers 200.
    fn assign<'a>(&'a self, item: &'a Item, member: &'a Member) -> TrackerFuture<'a, ()>;

    /// Post `body` as a new comment on `item`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::UnexpectedStatus` unless the backend answers 201.
    fn comment<'a>(&'a self, item: &'a Item, body: &'a str) -> TrackerFuture<'a, ()>;
}
