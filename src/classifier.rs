//! Staleness classification of open items.

use chrono::{DateTime, Duration, Utc};

use crate::models::Item;

/// What the run should do with an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Unassigned pull request old enough to get a reviewer.
    NeedsAssignment,
    /// Assigned pull request old enough to nudge its assignee.
    NeedsReminder,
    /// Nothing to do.
    Skip,
}

/// Age thresholds after which an item is considered stale.
///
/// The two durations are independent; `remind_after` is normally the
/// larger of the two.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Thresholds {
    /// Age at which an unassigned pull request gets an assignee.
    pub assign_after: Duration,
    /// Age at which an assigned pull request triggers a reminder.
    pub remind_after: Duration,
}

/// Classify a single item at `now`. Ages equal to a threshold count as stale.
#[must_use]
pub fn classify(item: &Item, thresholds: &Thresholds, now: DateTime<Utc>) -> Classification {
    if !item.is_pull_request() {
        return Classification::Skip;
    }

    let age = now.signed_duration_since(item.created_at);
    match item.assignee {
        None if age >= thresholds.assign_after => Classification::NeedsAssignment,
        Some(_) if age >= thresholds.remind_after => Classification::NeedsReminder,
        _ => Classification::Skip,
    }
}

/// Classify every item and keep the stale ones, in input order.
#[must_use]
pub fn classify_all(
    items: Vec<Item>,
    thresholds: &Thresholds,
    now: DateTime<Utc>,
) -> Vec<(Item, Classification)> {
    items
        .into_iter()
        .filter_map(|item| match classify(&item, thresholds, now) {
            Classification::Skip => None,
            class => Some((item, class)),
        })
        .collect()
}
