//! Community-wide aggregate counters shown on the landing page.

use serde::{Deserialize, Serialize};

use super::issue::Issue;
use super::user::User;

/// Derived counters over the current issue and user collections.
///
/// ## Invariants
/// - `open_issues + resolved_issues == total_issues`.
/// - `active_members` excludes banned users.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityStats {
    /// Every stored issue.
    pub total_issues: usize,
    /// Issues with status `resolved`.
    pub resolved_issues: usize,
    /// Users that are not banned.
    pub active_members: usize,
    /// Issues in any status other than `resolved`.
    pub open_issues: usize,
}

impl CommunityStats {
    /// Compute the counters from loaded collections.
    #[must_use]
    pub fn compute(issues: &[Issue], users: &[User]) -> Self {
        let total_issues = issues.len();
        let resolved_issues = issues.iter().filter(|issue| issue.is_resolved()).count();
        let active_members = users.iter().filter(|user| !user.is_banned()).count();

        Self {
            total_issues,
            resolved_issues,
            active_members,
            open_issues: total_issues - resolved_issues,
        }
    }
}
