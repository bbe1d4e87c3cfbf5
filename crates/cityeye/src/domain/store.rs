//! Civic store service: CRUD over issues, users and the session pointer.
//!
//! Every collection lives under one key as a JSON array. Each mutation loads
//! the whole array, changes it in memory and writes it back. Nothing guards
//! the gap between the read and the write, so two writers sharing a backend
//! race and the last write wins. Callers needing more must serialise access
//! themselves.

use std::fmt;
use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::category::categorize;
use super::error::StoreError;
use super::issue::{Issue, IssueDraft, IssueId, IssuePatch};
use super::ports::KeyValueStore;
use super::stats::CommunityStats;
use super::user::{User, UserDraft, UserId};
use super::validation::IssueSubmission;

/// Namespace yielding the web demo's `cityeye-issues` style keys.
pub const DEFAULT_NAMESPACE: &str = "cityeye";

/// Storage keys for the three persisted entries.
///
/// # Examples
///
/// ```
/// use cityeye::StorageKeys;
///
/// let keys = StorageKeys::with_namespace("ward-7");
/// assert_eq!(keys.issues(), "ward-7-issues");
/// assert_eq!(keys.current_user(), "ward-7-current-user");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    issues: String,
    users: String,
    current_user: String,
}

impl StorageKeys {
    /// Derive the keys for a namespace.
    #[must_use]
    pub fn with_namespace(namespace: &str) -> Self {
        Self {
            issues: format!("{namespace}-issues"),
            users: format!("{namespace}-users"),
            current_user: format!("{namespace}-current-user"),
        }
    }

    /// Key of the serialised issue array.
    pub fn issues(&self) -> &str {
        self.issues.as_str()
    }

    /// Key of the serialised user array.
    pub fn users(&self) -> &str {
        self.users.as_str()
    }

    /// Key of the raw current-user identifier.
    pub fn current_user(&self) -> &str {
        self.current_user.as_str()
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::with_namespace(DEFAULT_NAMESPACE)
    }
}

/// Owner of the persisted issue, user and session entries.
///
/// Reads never fail: a missing, unreadable or corrupt entry is reported at
/// `warn` and treated as empty. Mutations aimed at an unknown identifier are
/// silent no-ops; `Err` is reserved for a backend that refuses the write.
pub struct CivicStore<S> {
    backend: Arc<S>,
    clock: Arc<dyn Clock>,
    keys: StorageKeys,
}

impl<S> Clone for CivicStore<S> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            clock: Arc::clone(&self.clock),
            keys: self.keys.clone(),
        }
    }
}

impl<S> fmt::Debug for CivicStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CivicStore")
            .field("keys", &self.keys)
            .finish_non_exhaustive()
    }
}

impl<S> CivicStore<S> {
    /// Create a store over `backend` using the default key namespace.
    pub fn new(backend: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            keys: StorageKeys::default(),
        }
    }

    /// Replace the storage keys, e.g. to isolate a second profile.
    #[must_use]
    pub fn with_keys(mut self, keys: StorageKeys) -> Self {
        self.keys = keys;
        self
    }

    /// Storage keys in use.
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }
}

impl<S> CivicStore<S>
where
    S: KeyValueStore,
{
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!(%error, key, "storage read failed; treating entry as empty");
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(values) => values,
            Err(error) => {
                warn!(%error, key, "stored entry is corrupt; treating entry as empty");
                Vec::new()
            }
        }
    }

    fn store_collection<T: Serialize>(&self, key: &str, values: &[T]) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(values).map_err(|err| StoreError::Encode {
            key: key.to_owned(),
            message: err.to_string(),
        })?;
        self.backend.set(key, &encoded)?;
        Ok(())
    }

    /// Apply `change` to the matching issue and persist. Returns `false`
    /// without writing when no issue has `id`.
    pub(super) fn modify_issue<F>(&self, id: &IssueId, change: F) -> Result<bool, StoreError>
    where
        F: FnOnce(&mut Issue),
    {
        let mut issues = self.list_issues();
        let Some(issue) = issues.iter_mut().find(|issue| issue.id() == id) else {
            debug!(issue_id = %id, "issue not found; nothing to change");
            return Ok(false);
        };
        change(issue);
        self.store_collection(self.keys.issues(), &issues)?;
        Ok(true)
    }

    /// Remove the matching issue. Returns `false` when no issue has `id`.
    pub(super) fn remove_issue(&self, id: &IssueId) -> Result<bool, StoreError> {
        let mut issues = self.list_issues();
        let before = issues.len();
        issues.retain(|issue| issue.id() != id);
        if issues.len() == before {
            debug!(issue_id = %id, "issue not found; nothing to delete");
            return Ok(false);
        }
        self.store_collection(self.keys.issues(), &issues)?;
        Ok(true)
    }

    /// Mark the matching user banned. Returns `false` when no user has `id`.
    pub(super) fn mark_banned(&self, id: &UserId) -> Result<bool, StoreError> {
        let mut users = self.list_users();
        let Some(user) = users.iter_mut().find(|user| user.id() == id) else {
            debug!(user_id = %id, "user not found; nothing to ban");
            return Ok(false);
        };
        user.ban();
        self.store_collection(self.keys.users(), &users)?;
        Ok(true)
    }

    /// All stored issues in storage order.
    pub fn list_issues(&self) -> Vec<Issue> {
        self.load_collection(self.keys.issues())
    }

    /// Persist a new issue.
    ///
    /// A fresh identifier and creation time are assigned, likes start at
    /// zero and the status is forced to `reported` whatever the draft says.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn create_issue(&self, draft: IssueDraft) -> Result<Issue, StoreError> {
        let mut issues = self.list_issues();
        let issue = Issue::from_draft(draft, IssueId::random(), self.clock.utc());
        issues.push(issue.clone());
        self.store_collection(self.keys.issues(), &issues)?;
        debug!(issue_id = %issue.id(), category = %issue.category(), "issue created");
        Ok(issue)
    }

    /// Merge `patch` into the issue with `id`; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn update_issue(&self, id: &IssueId, patch: IssuePatch) -> Result<(), StoreError> {
        self.modify_issue(id, |issue| issue.apply(patch))?;
        Ok(())
    }

    /// Delete the issue with `id`; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn delete_issue(&self, id: &IssueId) -> Result<(), StoreError> {
        self.remove_issue(id)?;
        Ok(())
    }

    /// Add `user_id`'s like to the issue, or remove it if already present.
    /// No-op when the issue is absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn toggle_like(&self, issue_id: &IssueId, user_id: &UserId) -> Result<(), StoreError> {
        self.modify_issue(issue_id, |issue| {
            let liked = issue.toggle_like(user_id);
            debug!(issue_id = %issue_id, user_id = %user_id, liked, "like toggled");
        })?;
        Ok(())
    }

    /// All stored users in storage order.
    pub fn list_users(&self) -> Vec<User> {
        self.load_collection(self.keys.users())
    }

    /// Look up a user by identifier.
    pub fn find_user(&self, id: &UserId) -> Option<User> {
        self.list_users().into_iter().find(|user| user.id() == id)
    }

    /// Persist a new, unbanned user.
    ///
    /// The draft is stored as given; see [`UserDraft::validate`] for the
    /// form rules callers are expected to apply first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn create_user(&self, draft: UserDraft) -> Result<User, StoreError> {
        let mut users = self.list_users();
        let user = User::from_draft(draft, UserId::random(), self.clock.utc());
        users.push(user.clone());
        self.store_collection(self.keys.users(), &users)?;
        debug!(user_id = %user.id(), role = ?user.role(), "user created");
        Ok(user)
    }

    /// Set the banned flag on the user with `id`; no-op when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn ban_user(&self, id: &UserId) -> Result<(), StoreError> {
        self.mark_banned(id)?;
        Ok(())
    }

    /// Identifier held by the session pointer, if any.
    pub fn current_user_id(&self) -> Option<UserId> {
        let key = self.keys.current_user();
        match self.backend.get(key) {
            Ok(Some(raw)) if !raw.is_empty() => Some(UserId::new(raw)),
            Ok(_) => None,
            Err(error) => {
                warn!(%error, key, "session read failed; treating as signed out");
                None
            }
        }
    }

    /// Resolve the session pointer. `None` when unset or dangling.
    pub fn current_user(&self) -> Option<User> {
        let id = self.current_user_id()?;
        let user = self.find_user(&id);
        if user.is_none() {
            debug!(user_id = %id, "session points at an unknown user");
        }
        user
    }

    /// Point the session at `user_id`. The identifier is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn set_current_user(&self, user_id: &UserId) -> Result<(), StoreError> {
        self.backend.set(self.keys.current_user(), user_id.as_ref())?;
        Ok(())
    }

    /// Clear the session pointer.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the removal.
    pub fn clear_current_user(&self) -> Result<(), StoreError> {
        self.backend.remove(self.keys.current_user())?;
        Ok(())
    }

    /// Counters over the current collections.
    pub fn community_stats(&self) -> CommunityStats {
        CommunityStats::compute(&self.list_issues(), &self.list_users())
    }

    /// Categorise and persist a citizen's report on behalf of `reporter`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn report_issue(
        &self,
        reporter: &User,
        submission: IssueSubmission,
    ) -> Result<Issue, StoreError> {
        let category = categorize(&submission.title, &submission.description);
        let IssueSubmission {
            title,
            description,
            location,
            image,
        } = submission;

        self.create_issue(IssueDraft {
            title,
            description,
            location,
            category,
            status: None,
            image,
            reported_by: reporter.id().clone(),
        })
    }

    /// Register a user and sign them in.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when either write is rejected. A failure on the
    /// session write leaves the user registered but signed out.
    pub fn sign_up(&self, draft: UserDraft) -> Result<User, StoreError> {
        let user = self.create_user(draft)?;
        self.set_current_user(user.id())?;
        info!(user_id = %user.id(), role = ?user.role(), "user signed up");
        Ok(user)
    }
}
