//! Organization member model.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A GitHub account that can author, own, or review a pull request.
///
/// Identity is the numeric `id`; logins can be renamed, so two members with
/// the same `id` are equal even when their handles differ.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Member {
    /// Stable numeric account identifier.
    pub id: i64,
    /// Display handle (`login`).
    pub login: String,
}

impl Member {
    /// Create a member from its id and login.
    #[must_use]
    pub fn new(id: i64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }

    /// Whether this member's login matches `handle`, ignoring ASCII case.
    #[must_use]
    pub fn is_handle(&self, handle: &str) -> bool {
        self.login.eq_ignore_ascii_case(handle)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
