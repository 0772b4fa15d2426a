//! Circular cursor over a fixed member list.

use crate::models::Member;

/// Round-robin sequence over a snapshot of the member pool.
///
/// Any `len()` consecutive draws return every member exactly once, and the
/// cycle repeats indefinitely. The member list never changes after
/// construction.
#[derive(Debug, Clone)]
pub struct AssignmentRing {
    members: Vec<Member>,
    cursor: usize,
}

impl AssignmentRing {
    /// Build a ring whose first draw is `members[offset % len]`.
    #[must_use]
    pub fn new(members: Vec<Member>, offset: usize) -> Self {
        let cursor = if members.is_empty() {
            0
        } else {
            offset % members.len()
        };
        Self { members, cursor }
    }

    /// Number of members on the ring.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the ring has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Return the member under the cursor and advance by one, wrapping.
    pub fn next_from_ring(&mut self) -> Option<Member> {
        let member = self.members.get(self.cursor)?.clone();
        self.cursor = (self.cursor + 1) % self.members.len();
        Some(member)
    }
}
