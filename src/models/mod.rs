//! Domain model module declarations.

pub mod item;
pub mod member;
pub mod vacation;

pub use item::{Item, ItemLocator, PullRequestRef};
pub use member::Member;
pub use vacation::VacationWindow;
