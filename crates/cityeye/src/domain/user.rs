//! Community member data model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque user identifier.
///
/// New identifiers are random UUIDs, but persisted records are accepted with
/// whatever string they carry so that hand-edited or legacy data still loads.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
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

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Role selected at sign-up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Reports and likes issues.
    #[default]
    Citizen,
    /// Triages issues and bans users.
    Admin,
}

/// Demo stand-in for a national identity number.
///
/// The store keeps whatever the caller supplied. Format checks live in
/// [`IdentityCode::is_well_formed`] and [`UserDraft::validate`] and are the
/// caller's responsibility; nothing is ever verified against a registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityCode(String);

impl IdentityCode {
    /// Wrap a raw code as entered.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Keep only the ASCII digits of free-form input such as
    /// `"1234 5678 9012"`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cityeye::IdentityCode;
    ///
    /// let code = IdentityCode::from_input("1234 5678-9012");
    /// assert_eq!(code.as_ref(), "123456789012");
    /// assert!(code.is_well_formed());
    /// ```
    #[must_use]
    pub fn from_input(input: &str) -> Self {
        Self(input.chars().filter(char::is_ascii_digit).collect())
    }

    /// `true` when the code is exactly twelve ASCII digits.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        super::validation::identity_code_regex().is_match(&self.0)
    }
}

impl AsRef<str> for IdentityCode {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Sign-up input for [`crate::CivicStore::create_user`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    /// Display name.
    pub name: String,
    /// Optional contact email, stored verbatim.
    pub email: Option<String>,
    /// Demo identity code.
    pub identity_code: IdentityCode,
    /// Selected role.
    pub role: UserRole,
}

impl UserDraft {
    /// Build a draft without an email address.
    pub fn new(name: impl Into<String>, identity_code: impl Into<String>, role: UserRole) -> Self {
        Self {
            name: name.into(),
            email: None,
            identity_code: IdentityCode::new(identity_code),
            role,
        }
    }

    /// Attach an email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Registered community member.
///
/// ## Invariants
/// - `banned` starts `false` and is the only field the store mutates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(rename = "aadhaar", alias = "identityCode")]
    identity_code: IdentityCode,
    #[serde(default)]
    role: UserRole,
    #[serde(default)]
    banned: bool,
    created_at: DateTime<Utc>,
}

impl User {
    /// Materialise a new, unbanned user from a draft.
    pub(crate) fn from_draft(draft: UserDraft, id: UserId, created_at: DateTime<Utc>) -> Self {
        let UserDraft {
            name,
            email,
            identity_code,
            role,
        } = draft;
        Self {
            id,
            name,
            email,
            identity_code,
            role,
            banned: false,
            created_at,
        }
    }

    pub(crate) fn ban(&mut self) {
        self.banned = true;
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Contact email, if provided.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Demo identity code as supplied at sign-up.
    pub fn identity_code(&self) -> &IdentityCode {
        &self.identity_code
    }

    /// Selected role.
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// `true` once an admin has banned the user.
    pub fn is_banned(&self) -> bool {
        self.banned
    }

    /// `true` for the admin role.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Account creation time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
