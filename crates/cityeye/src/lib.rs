//! Local civic-issue store for the CityEye demo.
//!
//! Citizens report issues with a title, description, location and optional
//! photo. Each report is tagged with one of six categories by keyword match,
//! then persisted through a key-value port standing in for browser local
//! storage. Admins triage status, delete reports and ban users.
//!
//! # Overview
//!
//! - [`categorize`] maps free text onto a [`Category`] by first match over an
//!   ordered keyword table.
//! - [`CivicStore`] owns the issue, user and current-user entries and derives
//!   [`CommunityStats`].
//! - [`outbound`] provides the in-memory and file-backed key-value adapters.
//! - [`StoreSettings`] loads the data directory and key namespace via
//!   `ortho_config`.
//! - [`cli`] dispatches the `cityeye` binary's subcommands.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use cityeye::outbound::InMemoryKeyValueStore;
//! use cityeye::{Category, CivicStore, IssueSubmission, UserDraft, UserRole};
//! use mockable::DefaultClock;
//!
//! let store = CivicStore::new(
//!     Arc::new(InMemoryKeyValueStore::default()),
//!     Arc::new(DefaultClock),
//! );
//! let reporter = store
//!     .sign_up(UserDraft::new("Asha", "123456789012", UserRole::Citizen))
//!     .expect("sign up");
//! let issue = store
//!     .report_issue(
//!         &reporter,
//!         IssueSubmission::new("Pothole on 5th", "Deep hole near the bus stop", "5th Ave"),
//!     )
//!     .expect("report issue");
//!
//! assert_eq!(issue.category(), Category::Roadways);
//! assert_eq!(store.community_stats().open_issues, 1);
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod outbound;

pub use config::StoreSettings;
pub use domain::{
    AdminConsole, Category, CivicStore, CommunityStats, IdentityCode, Issue, IssueDraft, IssueId,
    IssuePatch, IssueStatus, IssueSubmission, StatusFilter, StorageKeys, StoreError, User,
    UserDraft, UserId, UserRole, ValidationError, categorize,
};
