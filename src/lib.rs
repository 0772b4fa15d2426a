#![forbid(unsafe_code)]

//! `pr-shepherd` assigns reviewers to stale pull requests and reminds
//! assignees of overdue ones.

pub mod assignment;
pub mod classifier;
pub mod config;
pub mod errors;
pub mod github;
pub mod models;
pub mod orchestrator;
pub mod slack;

pub use config::GlobalConfig;
pub use errors::{AppError, Result};
