//! Community feed: newest-first issue listings with reporter names.

use std::fmt;
use std::str::FromStr;

use super::issue::{Issue, IssueStatus};
use super::ports::KeyValueStore;
use super::store::CivicStore;
use super::user::User;

/// Name shown when an issue's reporter no longer resolves.
pub const UNKNOWN_REPORTER: &str = "Unknown User";

/// Status filter used by the feed and the admin console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    /// Every issue.
    #[default]
    All,
    /// Issues in one status.
    Only(IssueStatus),
}

impl StatusFilter {
    /// `true` when `issue` passes the filter.
    #[must_use]
    pub fn matches(self, issue: &Issue) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => issue.status() == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => fmt::Display::fmt(status, f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value == "all" {
            return Ok(Self::All);
        }
        value.parse().map(Self::Only)
    }
}

/// Resolve a reporter's display name against a loaded user list.
fn reporter_name_in<'a>(users: &'a [User], issue: &Issue) -> &'a str {
    users
        .iter()
        .find(|user| user.id() == issue.reported_by())
        .map_or(UNKNOWN_REPORTER, User::name)
}

impl<S> CivicStore<S>
where
    S: KeyValueStore,
{
    /// Issues passing `filter`, newest first.
    ///
    /// Issues created in the same instant keep their storage order.
    pub fn issue_feed(&self, filter: StatusFilter) -> Vec<Issue> {
        let mut issues: Vec<Issue> = self
            .list_issues()
            .into_iter()
            .filter(|issue| filter.matches(issue))
            .collect();
        issues.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        issues
    }

    /// Display name of the user who reported `issue`, or
    /// [`UNKNOWN_REPORTER`] when that user is gone.
    pub fn reporter_name(&self, issue: &Issue) -> String {
        reporter_name_in(&self.list_users(), issue).to_owned()
    }
}
