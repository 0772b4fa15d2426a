//! Run orchestration modules.
//!
//! Covers the per-run driver and the concurrent per-item dispatcher.

pub mod dispatcher;
pub mod run;

pub use dispatcher::{DispatchReport, Dispatcher, ItemOutcome};
pub use run::{Run, RunSettings, RunSummary};
