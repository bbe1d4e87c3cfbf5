//! Admin console: role-gated triage over the civic store.
//!
//! The store itself performs no authorisation. [`AdminConsole`] is the only
//! path to status changes, deletions and bans that checks the acting user's
//! role, and it records each applied action at `info`.

use tracing::{info, warn};

use super::error::StoreError;
use super::feed::StatusFilter;
use super::issue::{Issue, IssueId, IssuePatch, IssueStatus};
use super::ports::KeyValueStore;
use super::store::CivicStore;
use super::user::{User, UserId};

/// Triage handle bound to an admin actor.
///
/// Obtain one with [`CivicStore::admin_console`].
#[derive(Debug)]
pub struct AdminConsole<'a, S> {
    store: &'a CivicStore<S>,
    admin: User,
}

impl<S> CivicStore<S>
where
    S: KeyValueStore,
{
    /// Open the admin console for `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Forbidden`] when nobody is signed in or the actor
    /// does not hold the admin role.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use cityeye::outbound::InMemoryKeyValueStore;
    /// use cityeye::{CivicStore, StoreError, UserDraft, UserRole};
    /// use mockable::DefaultClock;
    ///
    /// let store = CivicStore::new(Arc::new(InMemoryKeyValueStore::default()), Arc::new(DefaultClock));
    /// let citizen = store.create_user(UserDraft::new("Asha", "123456789012", UserRole::Citizen))?;
    ///
    /// assert!(matches!(store.admin_console(Some(&citizen)), Err(StoreError::Forbidden { .. })));
    /// assert!(matches!(store.admin_console(None), Err(StoreError::Forbidden { .. })));
    /// # Ok::<(), cityeye::StoreError>(())
    /// ```
    pub fn admin_console(&self, actor: Option<&User>) -> Result<AdminConsole<'_, S>, StoreError> {
        match actor {
            Some(user) if user.is_admin() => Ok(AdminConsole {
                store: self,
                admin: user.clone(),
            }),
            Some(user) => {
                warn!(user_id = %user.id(), "admin console refused for non-admin user");
                Err(StoreError::forbidden("the admin role is required"))
            }
            None => Err(StoreError::forbidden("sign in as an admin first")),
        }
    }
}

impl<S> AdminConsole<'_, S>
where
    S: KeyValueStore,
{
    /// The acting admin.
    pub fn admin(&self) -> &User {
        &self.admin
    }

    /// Issues passing `filter`, newest first.
    pub fn issues(&self, filter: StatusFilter) -> Vec<Issue> {
        self.store.issue_feed(filter)
    }

    /// Every registered user, banned or not.
    pub fn users(&self) -> Vec<User> {
        self.store.list_users()
    }

    /// Move an issue to `status`; no-op when the issue is gone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn change_status(
        &self,
        issue_id: &IssueId,
        status: IssueStatus,
    ) -> Result<(), StoreError> {
        let patch = IssuePatch::status(status);
        if self.store.modify_issue(issue_id, |issue| issue.apply(patch))? {
            info!(
                admin_id = %self.admin.id(),
                issue_id = %issue_id,
                %status,
                "issue status changed"
            );
        }
        Ok(())
    }

    /// Delete an issue; no-op when already gone.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn delete_issue(&self, issue_id: &IssueId) -> Result<(), StoreError> {
        if self.store.remove_issue(issue_id)? {
            info!(admin_id = %self.admin.id(), issue_id = %issue_id, "issue deleted");
        }
        Ok(())
    }

    /// Ban a user; no-op when the user is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend rejects the write.
    pub fn ban_user(&self, user_id: &UserId) -> Result<(), StoreError> {
        if self.store.mark_banned(user_id)? {
            info!(admin_id = %self.admin.id(), user_id = %user_id, "user banned");
        }
        Ok(())
    }
}
