//! Run-wide cache of members eligible for review assignment.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::{info, warn};

use crate::github::IssueTracker;
use crate::models::vacation::{filter_available, VacationWindow};
use crate::models::Member;
use crate::{AppError, Result};

/// Vacation-filtered roster, fetched at most once per run.
///
/// The first caller fetches the roster while holding the initialization
/// lock; concurrent callers wait for that single fetch and then share its
/// result. A failed fetch leaves the cache empty so a later call can retry.
pub struct MemberPool {
    tracker: Arc<dyn IssueTracker>,
    vacations: Vec<VacationWindow>,
    evaluated_at: DateTime<Utc>,
    members: OnceCell<Arc<[Member]>>,
}

impl MemberPool {
    /// Create an empty pool; nothing is fetched until [`get`](Self::get).
    ///
    /// Vacation windows are evaluated against `evaluated_at`, the start
    /// instant of the run.
    #[must_use]
    pub fn new(
        tracker: Arc<dyn IssueTracker>,
        vacations: Vec<VacationWindow>,
        evaluated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            tracker,
            vacations,
            evaluated_at,
            members: OnceCell::new(),
        }
    }

    /// Return the eligible members, building the pool on first use.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Roster` if the roster cannot be fetched.
    pub async fn get(&self) -> Result<Arc<[Member]>> {
        self.members
            .get_or_try_init(|| self.build())
            .await
            .map(Arc::clone)
    }

    /// Whether the pool has been built in this run.
    #[must_use]
    pub fn is_built(&self) -> bool {
        self.members.initialized()
    }

    async fn build(&self) -> Result<Arc<[Member]>> {
        let roster = self
            .tracker
            .list_members()
            .await
            .map_err(|err| AppError::Roster(err.to_string()))?;

        let eligible = filter_available(&roster, &self.vacations, self.evaluated_at);
        let on_vacation = roster.len() - eligible.len();
        info!(
            roster = roster.len(),
            eligible = eligible.len(),
            on_vacation,
            "member pool built"
        );
        if eligible.is_empty() {
            warn!("member pool is empty; no reviewers can be assigned this run");
        }

        Ok(eligible.into())
    }
}

impl std::fmt::Debug for MemberPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberPool")
            .field("vacations", &self.vacations)
            .field("evaluated_at", &self.evaluated_at)
            .field("members", &self.members.get())
            .finish_non_exhaustive()
    }
}
