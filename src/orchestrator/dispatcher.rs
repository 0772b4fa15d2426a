//! Concurrent fan-out of assignment and reminder actions.
//!
//! One task is spawned per stale item and the dispatcher waits for all of
//! them. Per-item failures are logged and reported as outcomes; only roster
//! failures abort the run. The first roster failure aborts every task that
//! has not finished yet; writes already sent are not undone.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::assignment::FairSelector;
use crate::classifier::Classification;
use crate::github::IssueTracker;
use crate::models::{Item, Member};
use crate::slack::Notifier;
use crate::{AppError, Result};

/// Acknowledgement posted after a reviewer has been assigned.
#[must_use]
pub fn assignment_comment(member: &Member) -> String {
    format!(
        "Pull request seems to be stale, assigning @{} as the responsible developer.",
        member.login
    )
}

/// Terminal state of one item's dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Not stale; nothing was done.
    Skipped,
    /// Assigned and acknowledged with a comment.
    Commented {
        /// Login of the new assignee.
        assignee: String,
    },
    /// Assigned, but the acknowledgement comment failed.
    CommentFailed {
        /// Login of the new assignee.
        assignee: String,
    },
    /// The assignment write failed.
    AssignFailed {
        /// Login of the candidate that could not be assigned.
        assignee: String,
    },
    /// Every pool member was excluded.
    NoCandidate,
    /// Reminder delivered.
    Reminded,
    /// Reminder delivery failed.
    ReminderFailed,
    /// No reminder channel is configured.
    ReminderUnsupported,
}

/// Per-outcome tally of a dispatch round.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    /// Items that were assigned (with or without a comment).
    pub assigned: usize,
    /// Assigned items whose acknowledgement comment failed.
    pub comment_failures: usize,
    /// Items whose assignment write failed.
    pub assign_failures: usize,
    /// Items left unassigned because every member was excluded.
    pub no_candidate: usize,
    /// Reminders delivered.
    pub reminded: usize,
    /// Reminders that failed.
    pub reminder_failures: usize,
    /// Reminders skipped because no channel is configured.
    pub reminders_unsupported: usize,
    /// Items with nothing to do.
    pub skipped: usize,
}

impl DispatchReport {
    /// Add one outcome to the tally.
    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Skipped => self.skipped += 1,
            ItemOutcome::Commented { .. } => self.assigned += 1,
            ItemOutcome::CommentFailed { .. } => {
                self.assigned += 1;
                self.comment_failures += 1;
            }
            ItemOutcome::AssignFailed { .. } => self.assign_failures += 1,
            ItemOutcome::NoCandidate => self.no_candidate += 1,
            ItemOutcome::Reminded => self.reminded += 1,
            ItemOutcome::ReminderFailed => self.reminder_failures += 1,
            ItemOutcome::ReminderUnsupported => self.reminders_unsupported += 1,
        }
    }
}

/// Shared collaborators used by every dispatch task.
#[derive(Clone)]
pub struct Dispatcher {
    tracker: Arc<dyn IssueTracker>,
    selector: Arc<FairSelector>,
    notifier: Option<Arc<dyn Notifier>>,
    bot_login: Arc<str>,
}

impl Dispatcher {
    /// Create a dispatcher. Pass `None` as `notifier` to disable reminders.
    #[must_use]
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        selector: Arc<FairSelector>,
        notifier: Option<Arc<dyn Notifier>>,
        bot_login: &str,
    ) -> Self {
        Self {
            tracker,
            selector,
            notifier,
            bot_login: Arc::from(bot_login),
        }
    }

    /// Dispatch every classified item concurrently and wait for all of them.
    ///
    /// # Errors
    ///
    /// Returns the first `AppError::Roster` observed by any task. The
    /// remaining tasks are aborted at their next suspension point. Other
    /// failures are reflected in the report.
    pub async fn dispatch(&self, stale: Vec<(Item, Classification)>) -> Result<DispatchReport> {
        let mut tasks = JoinSet::new();

        for (item, class) in stale {
            let this = self.clone();
            let span = info_span!("item", number = item.number, repo = %repo_label(&item));
            tasks.spawn(async move { this.dispatch_one(&item, class).await }.instrument(span));
        }

        let mut report = DispatchReport::default();
        let mut fatal: Option<AppError> = None;

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(outcome)) => report.record(&outcome),
                Ok(Err(err)) => {
                    if fatal.is_none() {
                        error!(%err, pending = tasks.len(), "dispatch aborted by fatal error");
                        tasks.abort_all();
                        fatal = Some(err);
                    }
                }
                Err(err) if err.is_cancelled() => {
                    debug!("dispatch task cancelled");
                }
                Err(err) => {
                    error!(%err, "dispatch task panicked");
                }
            }
        }

        match fatal {
            Some(err) => Err(err),
            None => Ok(report),
        }
    }

    /// Run the action for a single item.
    ///
    /// # Errors
    ///
    /// Returns only fatal errors (see [`AppError::is_fatal`]).
    pub async fn dispatch_one(&self, item: &Item, class: Classification) -> Result<ItemOutcome> {
        match class {
            Classification::NeedsAssignment => self.assign(item).await,
            Classification::NeedsReminder => Ok(self.remind(item).await),
            Classification::Skip => {
                debug!("item skipped");
                Ok(ItemOutcome::Skipped)
            }
        }
    }

    async fn assign(&self, item: &Item) -> Result<ItemOutcome> {
        let candidate = match self.selector.next_candidate(&item.user, &self.bot_login).await {
            Ok(member) => member,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                warn!(author = %item.user.login, %err, "cannot pick reviewer");
                return Ok(ItemOutcome::NoCandidate);
            }
        };

        if let Err(err) = self.tracker.assign(item, &candidate).await {
            error!(assignee = %candidate.login, id = item.id, %err, "cannot assign reviewer");
            return Ok(ItemOutcome::AssignFailed {
                assignee: candidate.login,
            });
        }

        let comment = assignment_comment(&candidate);
        match self.tracker.comment(item, &comment).await {
            Ok(()) => {
                info!(assignee = %candidate.login, "reviewer assigned and notified");
                Ok(ItemOutcome::Commented {
                    assignee: candidate.login,
                })
            }
            Err(err) => {
                warn!(assignee = %candidate.login, %err, "cannot comment on pull request");
                Ok(ItemOutcome::CommentFailed {
                    assignee: candidate.login,
                })
            }
        }
    }

    async fn remind(&self, item: &Item) -> ItemOutcome {
        let Some(notifier) = &self.notifier else {
            debug!("reminders not configured");
            return ItemOutcome::ReminderUnsupported;
        };

        match notifier.remind(item).await {
            Ok(()) => ItemOutcome::Reminded,
            Err(AppError::NotSupported(reason)) => {
                debug!(reason, "reminder not supported");
                ItemOutcome::ReminderUnsupported
            }
            Err(err) => {
                warn!(%err, "cannot send reminder");
                ItemOutcome::ReminderFailed
            }
        }
    }
}

fn repo_label(item: &Item) -> String {
    item.locator()
        .map_or_else(|_| item.html_url.clone(), |loc| format!("{}/{}", loc.owner, loc.repo))
}
