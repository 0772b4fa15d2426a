//! Reviewer assignment engine: eligible pool, ring, and selector.

pub mod pool;
pub mod ring;
pub mod selector;

pub use pool::MemberPool;
pub use ring::AssignmentRing;
pub use selector::FairSelector;
