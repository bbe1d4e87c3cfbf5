//! Reported civic issue data model.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::Category;
use super::user::UserId;

/// Opaque issue identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueId(String);

impl IssueId {
    /// Wrap an existing identifier without validation.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for IssueId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for IssueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Triage state of an issue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    /// Newly submitted; every issue starts here.
    #[default]
    Reported,
    /// Acknowledged by an admin.
    UnderReview,
    /// Work has started.
    InProgress,
    /// Closed as fixed.
    Resolved,
}

impl IssueStatus {
    /// Wire value, e.g. `under-review`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reported => "reported",
            Self::UnderReview => "under-review",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }
}

impl fmt::Display for IssueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for IssueStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "reported" => Ok(Self::Reported),
            "under-review" => Ok(Self::UnderReview),
            "in-progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            other => Err(format!("unknown issue status '{other}'")),
        }
    }
}

/// Input for [`crate::CivicStore::create_issue`].
///
/// `status` is accepted so callers can pass a full form payload, but the
/// store always overrides it with [`IssueStatus::Reported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDraft {
    /// Short summary.
    pub title: String,
    /// Free-text details.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Category, normally produced by [`crate::categorize`].
    pub category: Category,
    /// Ignored on creation.
    pub status: Option<IssueStatus>,
    /// Optional photo payload encoded as text.
    pub image: Option<String>,
    /// Reporting user.
    pub reported_by: UserId,
}

/// Partial update merged by [`crate::CivicStore::update_issue`].
///
/// Only the user-editable fields are patchable. Identity, reporter, creation
/// time and likes stay under the store's control.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement location.
    pub location: Option<String>,
    /// Replacement category.
    pub category: Option<Category>,
    /// Replacement status.
    pub status: Option<IssueStatus>,
    /// Replacement photo payload.
    pub image: Option<String>,
}

impl IssuePatch {
    /// Patch changing only the status, as the admin panel does.
    #[must_use]
    pub fn status(status: IssueStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// A reported civic problem.
///
/// ## Invariants
/// - `likes()` always equals the number of distinct likers.
/// - `liked_by` holds no duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "IssueRecord", into = "IssueRecord")]
pub struct Issue {
    id: IssueId,
    title: String,
    description: String,
    location: String,
    category: Category,
    status: IssueStatus,
    image: Option<String>,
    reported_by: UserId,
    created_at: DateTime<Utc>,
    liked_by: BTreeSet<UserId>,
}

impl Issue {
    /// Materialise a freshly reported issue from a draft.
    pub(crate) fn from_draft(draft: IssueDraft, id: IssueId, created_at: DateTime<Utc>) -> Self {
        let IssueDraft {
            title,
            description,
            location,
            category,
            status: _,
            image,
            reported_by,
        } = draft;
        Self {
            id,
            title,
            description,
            location,
            category,
            status: IssueStatus::Reported,
            image,
            reported_by,
            created_at,
            liked_by: BTreeSet::new(),
        }
    }

    pub(crate) fn apply(&mut self, patch: IssuePatch) {
        let IssuePatch {
            title,
            description,
            location,
            category,
            status,
            image,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = description;
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(status) = status {
            self.status = status;
        }
        if image.is_some() {
            self.image = image;
        }
    }

    /// Flip `user_id`'s like. Returns `true` when the like was added.
    pub(crate) fn toggle_like(&mut self, user_id: &UserId) -> bool {
        if self.liked_by.remove(user_id) {
            false
        } else {
            self.liked_by.insert(user_id.clone());
            true
        }
    }

    /// Stable identifier.
    pub fn id(&self) -> &IssueId {
        &self.id
    }

    /// Short summary.
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// Free-text details.
    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    /// Free-text location.
    pub fn location(&self) -> &str {
        self.location.as_str()
    }

    /// Assigned category.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Current triage state.
    pub fn status(&self) -> IssueStatus {
        self.status
    }

    /// Photo payload, if one was attached.
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// User who reported the issue.
    pub fn reported_by(&self) -> &UserId {
        &self.reported_by
    }

    /// Submission time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Users currently liking the issue.
    pub fn liked_by(&self) -> &BTreeSet<UserId> {
        &self.liked_by
    }

    /// Number of distinct users who liked the issue.
    pub fn likes(&self) -> usize {
        self.liked_by.len()
    }

    /// `true` when `user_id` currently likes the issue.
    pub fn is_liked_by(&self, user_id: &UserId) -> bool {
        self.liked_by.contains(user_id)
    }

    /// `true` once the issue reached [`IssueStatus::Resolved`].
    pub fn is_resolved(&self) -> bool {
        self.status == IssueStatus::Resolved
    }
}

/// Persisted shape of an [`Issue`].
///
/// The stored `likes` count is written for readers of the raw entry but is
/// recomputed from `likedBy` on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueRecord {
    id: IssueId,
    title: String,
    description: String,
    location: String,
    category: Category,
    #[serde(default)]
    status: IssueStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    reported_by: UserId,
    created_at: DateTime<Utc>,
    #[serde(default)]
    likes: usize,
    #[serde(default)]
    liked_by: Vec<UserId>,
}

impl From<Issue> for IssueRecord {
    fn from(value: Issue) -> Self {
        let likes = value.likes();
        let Issue {
            id,
            title,
            description,
            location,
            category,
            status,
            image,
            reported_by,
            created_at,
            liked_by,
        } = value;
        Self {
            id,
            title,
            description,
            location,
            category,
            status,
            image,
            reported_by,
            created_at,
            likes,
            liked_by: liked_by.into_iter().collect(),
        }
    }
}

impl From<IssueRecord> for Issue {
    fn from(value: IssueRecord) -> Self {
        let IssueRecord {
            id,
            title,
            description,
            location,
            category,
            status,
            image,
            reported_by,
            created_at,
            likes: _,
            liked_by,
        } = value;
        Self {
            id,
            title,
            description,
            location,
            category,
            status,
            image,
            reported_by,
            created_at,
            liked_by: liked_by.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for issue state transitions and the persisted shape.

    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    #[fixture]
    fn issue() -> Issue {
        let created_at = Utc
            .with_ymd_and_hms(2026, 3, 2, 8, 15, 0)
            .single()
            .expect("valid timestamp");
        Issue::from_draft(
            IssueDraft {
                title: "Pothole".to_owned(),
                description: "Deep hole".to_owned(),
                location: "Main St".to_owned(),
                category: Category::Roadways,
                status: Some(IssueStatus::Resolved),
                image: None,
                reported_by: UserId::new("u-1"),
            },
            IssueId::new("i-1"),
            created_at,
        )
    }

    #[rstest]
    fn drafts_always_start_reported(issue: Issue) {
        assert_eq!(issue.status(), IssueStatus::Reported);
        assert_eq!(issue.likes(), 0);
        assert!(issue.liked_by().is_empty());
    }

    #[rstest]
    fn toggling_twice_restores_likes(mut issue: Issue) {
        let fan = UserId::new("u-2");
        let before = issue.clone();

        assert!(issue.toggle_like(&fan));
        assert_eq!(issue.likes(), 1);
        assert!(issue.is_liked_by(&fan));

        assert!(!issue.toggle_like(&fan));
        assert_eq!(issue, before);
    }

    #[rstest]
    fn patch_merges_only_supplied_fields(mut issue: Issue) {
        issue.apply(IssuePatch {
            location: Some("High St".to_owned()),
            ..IssuePatch::status(IssueStatus::InProgress)
        });

        assert_eq!(issue.status(), IssueStatus::InProgress);
        assert_eq!(issue.location(), "High St");
        assert_eq!(issue.title(), "Pothole");
        assert_eq!(issue.category(), Category::Roadways);
    }

    #[rstest]
    fn serialises_with_like_count(mut issue: Issue) {
        issue.toggle_like(&UserId::new("u-2"));
        let value = serde_json::to_value(&issue).expect("serialise");

        assert_eq!(
            value,
            json!({
                "id": "i-1",
                "title": "Pothole",
                "description": "Deep hole",
                "location": "Main St",
                "category": "Roadways",
                "status": "reported",
                "reportedBy": "u-1",
                "createdAt": "2026-03-02T08:15:00Z",
                "likes": 1,
                "likedBy": ["u-2"],
            })
        );
    }

    #[test]
    fn load_reconciles_count_and_duplicates() {
        let issue: Issue = serde_json::from_value(json!({
            "id": "1717171717171",
            "title": "Leak",
            "description": "Pipe burst",
            "location": "Lake Rd",
            "category": "Sewage",
            "status": "under-review",
            "image": "",
            "reportedBy": "u-1",
            "createdAt": "2026-03-02T08:15:00.000Z",
            "likes": 7,
            "likedBy": ["u-2", "u-3", "u-2"],
        }))
        .expect("legacy record");

        assert_eq!(issue.likes(), 2);
        assert_eq!(issue.status(), IssueStatus::UnderReview);
        assert_eq!(issue.image(), Some(""));
    }

    #[rstest]
    #[case(IssueStatus::Reported)]
    #[case(IssueStatus::UnderReview)]
    #[case(IssueStatus::InProgress)]
    #[case(IssueStatus::Resolved)]
    fn status_wire_value_matches_serde(#[case] status: IssueStatus) {
        let json = serde_json::to_string(&status).expect("serialise");
        assert_eq!(json, format!("\"{}\"", status.as_str()));
        assert_eq!(status.as_str().parse::<IssueStatus>(), Ok(status));
    }

    #[test]
    fn unknown_status_is_rejected_by_parser() {
        assert!("closed".parse::<IssueStatus>().is_err());
    }
}
