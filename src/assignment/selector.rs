//! Fair, self-exclusion-aware reviewer selection.
//!
//! The ring is seeded lazily from the [`MemberPool`] in pool order, with a
//! start offset drawn from the OS random source so that successive runs do
//! not always begin with the same member. Selection holds the ring lock for
//! the whole draw loop: a caller's consecutive draws are never interleaved
//! with another caller's, so `len()` draws are guaranteed to visit every
//! member once.
//!
//! A roster failure poisons the selector for the rest of the run: every
//! later caller gets the same `AppError::Roster` without another fetch.

use std::sync::Arc;

use rand::rngs::OsRng;
use rand::Rng;
use tokio::sync::Mutex;
use tracing::debug;

use crate::assignment::pool::MemberPool;
use crate::assignment::ring::AssignmentRing;
use crate::models::Member;
use crate::{AppError, Result};

/// Chooses the ring's start offset given the pool size.
pub type OffsetSource = Arc<dyn Fn(usize) -> usize + Send + Sync>;

/// Uniform offset in `[0, len)` from the operating system's CSPRNG.
#[must_use]
pub fn random_offset(len: usize) -> usize {
    if len == 0 {
        0
    } else {
        OsRng.gen_range(0..len)
    }
}

#[derive(Debug)]
enum RingState {
    Unseeded,
    Seeded(AssignmentRing),
    Failed(String),
}

/// Serves round-robin draws over the eligible pool to concurrent callers.
pub struct FairSelector {
    pool: Arc<MemberPool>,
    ring: Mutex<RingState>,
    offset: OffsetSource,
}

impl FairSelector {
    /// Selector with a random start offset.
    #[must_use]
    pub fn new(pool: Arc<MemberPool>) -> Self {
        Self::with_offset_source(pool, Arc::new(random_offset))
    }

    /// Selector with a caller-provided start offset.
    #[must_use]
    pub fn with_offset_source(pool: Arc<MemberPool>, offset: OffsetSource) -> Self {
        Self {
            pool,
            ring: Mutex::new(RingState::Unseeded),
            offset,
        }
    }

    /// Draw the next member from the ring without any exclusion.
    ///
    /// Returns `Ok(None)` when the pool is empty.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Roster` if the pool has to be built and the roster
    /// fetch fails, or if an earlier fetch in this run failed.
    pub async fn next_from_ring(&self) -> Result<Option<Member>> {
        let mut guard = self.ring.lock().await;
        let ring = self.ring_mut(&mut guard).await?;
        Ok(ring.next_from_ring())
    }

    /// Draw the next member who is neither `exclude_author` nor the bot
    /// account `exclude_self`.
    ///
    /// At most one full cycle of the ring is drawn.
    ///
    /// # Errors
    ///
    /// Returns `AppError::NoEligibleAssignee` if the pool is empty or every
    /// member is excluded, and `AppError::Roster` if the pool cannot be
    /// built (now or by an earlier caller).
    pub async fn next_candidate(
        &self,
        exclude_author: &Member,
        exclude_self: &str,
    ) -> Result<Member> {
        let mut guard = self.ring.lock().await;
        let ring = self.ring_mut(&mut guard).await?;

        for _ in 0..ring.len() {
            let Some(member) = ring.next_from_ring() else {
                break;
            };
            if member == *exclude_author || member.is_handle(exclude_self) {
                debug!(skipped = %member.login, "candidate excluded");
                continue;
            }
            return Ok(member);
        }

        Err(AppError::NoEligibleAssignee(format!(
            "none of {} pool member(s) is eligible for a pull request by {}",
            ring.len(),
            exclude_author.login
        )))
    }

    async fn ring_mut<'g>(&self, state: &'g mut RingState) -> Result<&'g mut AssignmentRing> {
        if matches!(state, RingState::Unseeded) {
            *state = match self.pool.get().await {
                Ok(members) => {
                    let offset = (self.offset)(members.len());
                    debug!(members = members.len(), offset, "assignment ring seeded");
                    RingState::Seeded(AssignmentRing::new(members.to_vec(), offset))
                }
                Err(AppError::Roster(msg)) => RingState::Failed(msg),
                Err(err) => RingState::Failed(err.to_string()),
            };
        }

        match state {
            RingState::Seeded(ring) => Ok(ring),
            RingState::Failed(msg) => Err(AppError::Roster(msg.clone())),
            RingState::Unseeded => Err(AppError::Roster("assignment ring not seeded".into())),
        }
    }
}
