//! One batch run: fetch, classify, dispatch.
//!
//! A [`Run`] owns every piece of per-run state (the member pool and the
//! assignment ring included). Nothing survives the process, so each
//! invocation starts from a fresh roster and a fresh random ring offset.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::assignment::selector::{random_offset, OffsetSource};
use crate::assignment::{FairSelector, MemberPool};
use crate::classifier::{classify_all, Classification, Thresholds};
use crate::config::GlobalConfig;
use crate::github::IssueTracker;
use crate::models::VacationWindow;
use crate::orchestrator::dispatcher::{DispatchReport, Dispatcher};
use crate::slack::Notifier;
use crate::Result;

/// Inputs of a run that do not depend on the transports.
#[derive(Debug, Clone)]
pub struct RunSettings {
    /// Login of the automation account; never assigned.
    pub bot_login: String,
    /// Staleness thresholds.
    pub thresholds: Thresholds,
    /// Configured vacation windows.
    pub vacations: Vec<VacationWindow>,
    /// Evaluation instant for ages and vacations.
    pub now: DateTime<Utc>,
}

impl RunSettings {
    /// Derive settings from the loaded configuration.
    #[must_use]
    pub fn from_config(config: &GlobalConfig, now: DateTime<Utc>) -> Self {
        Self {
            bot_login: config.bot_login.clone(),
            thresholds: config.thresholds(),
            vacations: config.vacation_windows(),
            now,
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Identifier attached to every log line of the run.
    pub run_id: Uuid,
    /// Open items returned by the listing.
    pub fetched: usize,
    /// Items that needed assignment.
    pub needs_assignment: usize,
    /// Items that needed a reminder.
    pub needs_reminder: usize,
    /// Outcome tally from the dispatcher.
    pub report: DispatchReport,
}

/// A single stateless batch run.
pub struct Run {
    run_id: Uuid,
    tracker: Arc<dyn IssueTracker>,
    pool: Arc<MemberPool>,
    dispatcher: Dispatcher,
    thresholds: Thresholds,
    now: DateTime<Utc>,
}

impl Run {
    /// Build a run with a randomly seeded assignment ring.
    #[must_use]
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        notifier: Option<Arc<dyn Notifier>>,
        settings: RunSettings,
    ) -> Self {
        Self::with_offset_source(tracker, notifier, settings, Arc::new(random_offset))
    }

    /// Build a run whose ring start offset comes from `offset`.
    #[must_use]
    pub fn with_offset_source(
        tracker: Arc<dyn IssueTracker>,
        notifier: Option<Arc<dyn Notifier>>,
        settings: RunSettings,
        offset: OffsetSource,
    ) -> Self {
        let pool = Arc::new(MemberPool::new(
            Arc::clone(&tracker),
            settings.vacations,
            settings.now,
        ));
        let selector = Arc::new(FairSelector::with_offset_source(Arc::clone(&pool), offset));
        let dispatcher = Dispatcher::new(
            Arc::clone(&tracker),
            selector,
            notifier,
            &settings.bot_login,
        );

        Self {
            run_id: Uuid::new_v4(),
            tracker,
            pool,
            dispatcher,
            thresholds: settings.thresholds,
            now: settings.now,
        }
    }

    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// The run's member pool.
    #[must_use]
    pub fn pool(&self) -> &Arc<MemberPool> {
        &self.pool
    }

    /// Fetch open items, classify them, and dispatch the stale ones.
    ///
    /// # Errors
    ///
    /// Returns the listing error if open items cannot be fetched, or a
    /// roster error if the member pool cannot be built. Per-item failures
    /// are reported in the summary instead.
    pub async fn execute(&self) -> Result<RunSummary> {
        let span = info_span!("run", run_id = %self.run_id);
        self.execute_inner().instrument(span).await
    }

    async fn execute_inner(&self) -> Result<RunSummary> {
        let items = self.tracker.list_open_items().await.map_err(|err| {
            error!(%err, "cannot fetch open items");
            err
        })?;
        let fetched = items.len();

        let stale = classify_all(items, &self.thresholds, self.now);
        let needs_assignment = stale
            .iter()
            .filter(|(_, class)| *class == Classification::NeedsAssignment)
            .count();
        let needs_reminder = stale.len() - needs_assignment;
        info!(fetched, needs_assignment, needs_reminder, "items classified");

        let report = self.dispatcher.dispatch(stale).await?;
        info!(?report, "run complete");

        Ok(RunSummary {
            run_id: self.run_id,
            fetched,
            needs_assignment,
            needs_reminder,
            report,
        })
    }
}
