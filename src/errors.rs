//! Error types shared across the application.

use std::fmt::{Display, Formatter};

/// Shared application result type.
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error enumeration covering all domain failure modes.
#[derive(Debug)]
pub enum AppError {
    /// Configuration file, validation, or credential lookup failure.
    Config(String),
    /// Transport failure while talking to GitHub or Slack.
    Http(String),
    /// Malformed payload or unparseable item locator.
    Decode(String),
    /// The backend answered with a status other than the expected one.
    UnexpectedStatus {
        /// Short name of the request that failed (e.g. `assign`).
        operation: &'static str,
        /// HTTP status code returned by the backend.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The team or organization roster could not be fetched.
    Roster(String),
    /// No pool member is left after excluding the author and the bot.
    NoEligibleAssignee(String),
    /// The requested feature is not configured for this run.
    NotSupported(String),
}

impl AppError {
    /// Whether this error must abort the whole run rather than a single item.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Roster(_))
    }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Http(msg) => write!(f, "http: {msg}"),
            Self::Decode(msg) => write!(f, "decode: {msg}"),
            Self::UnexpectedStatus {
                operation,
                status,
                body,
            } => {
                if body.is_empty() {
                    write!(f, "unexpected status: {operation} returned {status}")
                } else {
                    write!(f, "unexpected status: {operation} returned {status}: {body}")
                }
            }
            Self::Roster(msg) => write!(f, "roster: {msg}"),
            Self::NoEligibleAssignee(msg) => write!(f, "no eligible assignee: {msg}"),
            Self::NotSupported(msg) => write!(f, "not supported: {msg}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("invalid config: {err}"))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}
