//! Domain primitives, the categorizer and the civic store service.
//!
//! Purpose: keep the data model and every decision the demo makes (category
//! assignment, like toggling, ban bookkeeping, statistics) behind one
//! transport-agnostic boundary. Persistence is reached only through
//! [`ports::KeyValueStore`].
//!
//! Public surface:
//! - [`categorize`] and [`Category`]: keyword categorisation.
//! - [`Issue`], [`IssueDraft`], [`IssuePatch`], [`IssueStatus`]: reports.
//! - [`User`], [`UserDraft`], [`UserRole`], [`IdentityCode`]: members.
//! - [`CivicStore`]: CRUD over the persisted entries plus derived stats.
//! - [`AdminConsole`]: role-gated triage operations.

mod admin;
mod category;
mod error;
mod feed;
mod issue;
pub mod ports;
mod stats;
mod store;
mod user;
mod validation;

pub use self::admin::AdminConsole;
pub use self::category::{CATEGORY_RULES, Category, categorize};
pub use self::error::StoreError;
pub use self::feed::{StatusFilter, UNKNOWN_REPORTER};
pub use self::issue::{Issue, IssueDraft, IssueId, IssuePatch, IssueStatus};
pub use self::stats::CommunityStats;
pub use self::store::{CivicStore, DEFAULT_NAMESPACE, StorageKeys};
pub use self::user::{IdentityCode, User, UserDraft, UserId, UserRole};
pub use self::validation::{IDENTITY_CODE_LEN, IssueSubmission, ValidationError};
