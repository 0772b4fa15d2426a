//! Vacation windows that temporarily remove members from the assignment pool.
//!
//! Windows are configured as a comma-separated list of
//! `login:YYYY-MM-DD:YYYY-MM-DD` entries. Both dates are inclusive and are
//! interpreted in UTC; the end date covers its full day.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use tracing::warn;

use crate::models::member::Member;
use crate::{AppError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A single member's absence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VacationWindow {
    /// Login of the absent member.
    pub login: String,
    /// First day of the absence.
    pub start: NaiveDate,
    /// Last day of the absence (inclusive).
    pub end: NaiveDate,
}

impl VacationWindow {
    /// Parse one `login:start:end` entry.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` when the entry does not have exactly three
    /// segments, the login is empty, a date does not parse, or the end date
    /// precedes the start date.
    pub fn parse(entry: &str) -> Result<Self> {
        let parts: Vec<&str> = entry.trim().split(':').collect();
        let [login, start, end] = parts.as_slice() else {
            return Err(AppError::Config(format!(
                "vacation entry '{entry}' must have the form login:start:end"
            )));
        };

        let login = login.trim();
        if login.is_empty() {
            return Err(AppError::Config(format!(
                "vacation entry '{entry}' has an empty login"
            )));
        }

        let start = parse_date(entry, start)?;
        let end = parse_date(entry, end)?;
        if end < start {
            return Err(AppError::Config(format!(
                "vacation entry '{entry}' ends before it starts"
            )));
        }

        Ok(Self {
            login: login.to_owned(),
            start,
            end,
        })
    }

    /// Whether `now` falls inside the window.
    ///
    /// The window spans `[start 00:00, end + 1 day 00:00)` in UTC.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        let from = self.start.and_time(NaiveTime::MIN).and_utc();
        let Some(until) = self.end.checked_add_days(Days::new(1)) else {
            return now >= from;
        };
        let until = until.and_time(NaiveTime::MIN).and_utc();
        from <= now && now < until
    }

    /// Whether this window belongs to `member`.
    #[must_use]
    pub fn applies_to(&self, member: &Member) -> bool {
        member.is_handle(&self.login)
    }
}

fn parse_date(entry: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|err| {
        AppError::Config(format!("vacation entry '{entry}' has invalid date '{raw}': {err}"))
    })
}

/// Parse a comma-separated vacation list, skipping malformed entries.
///
/// Never fails: each bad entry is logged and ignored so that one typo does
/// not put the whole team back on rotation.
#[must_use]
pub fn parse_vacation_list(raw: &str) -> Vec<VacationWindow> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match VacationWindow::parse(entry) {
            Ok(window) => Some(window),
            Err(err) => {
                warn!(entry, %err, "ignoring malformed vacation entry");
                None
            }
        })
        .collect()
}

/// Keep only the members not on an active vacation at `now`.
///
/// Builds a new list rather than removing in place, so consecutive
/// vacationers are all evaluated.
#[must_use]
pub fn filter_available(
    members: &[Member],
    vacations: &[VacationWindow],
    now: DateTime<Utc>,
) -> Vec<Member> {
    let active: Vec<&VacationWindow> = vacations.iter().filter(|w| w.is_active(now)).collect();
    members
        .iter()
        .filter(|member| !active.iter().any(|w| w.applies_to(member)))
        .cloned()
        .collect()
}
