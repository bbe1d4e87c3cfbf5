//! Form-level input checks performed by callers before reaching the store.
//!
//! [`crate::CivicStore`] never calls these: it stores whatever it is given.
//! They exist so every front end applies the same sign-up and report form
//! rules.
//!
//! # Validation Rules
//!
//! - Issue title, description and location must be non-empty once trimmed.
//! - User name must be non-empty once trimmed.
//! - Identity code must be exactly [`IDENTITY_CODE_LEN`] ASCII digits.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::user::UserDraft;

/// Required length of a demo identity code.
pub const IDENTITY_CODE_LEN: usize = 12;

static IDENTITY_CODE_RE: OnceLock<Regex> = OnceLock::new();

pub(super) fn identity_code_regex() -> &'static Regex {
    IDENTITY_CODE_RE.get_or_init(|| {
        let pattern = format!("^[0-9]{{{IDENTITY_CODE_LEN}}}$");
        Regex::new(&pattern)
            .unwrap_or_else(|error| panic!("identity code regex failed to compile: {error}"))
    })
}

/// Reasons a form submission is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was blank.
    #[error("{field} must not be empty")]
    MissingField {
        /// Name of the blank field.
        field: &'static str,
    },
    /// The identity code is not twelve digits.
    #[error("identity code must be 12 digits")]
    MalformedIdentityCode,
}

/// Citizen-facing issue report, before categorisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSubmission {
    /// Short summary.
    pub title: String,
    /// Free-text details.
    pub description: String,
    /// Free-text location.
    pub location: String,
    /// Optional photo encoded as text (typically a data URL).
    pub image: Option<String>,
}

impl IssueSubmission {
    /// Build a submission without a photo.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            location: location.into(),
            image: None,
        }
    }

    /// Attach a photo payload.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Check that title, description and location are all present.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingField`] naming the first blank field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("title", &self.title)?;
        require("description", &self.description)?;
        require("location", &self.location)
    }
}

impl UserDraft {
    /// Check the sign-up form rules: a name and a twelve-digit code.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first failing rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use cityeye::{UserDraft, UserRole, ValidationError};
    ///
    /// let draft = UserDraft::new("Asha", "1234", UserRole::Citizen);
    /// assert_eq!(draft.validate(), Err(ValidationError::MalformedIdentityCode));
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        require("name", &self.name)?;
        require("identity code", self.identity_code.as_ref())?;
        if !self.identity_code.is_well_formed() {
            return Err(ValidationError::MalformedIdentityCode);
        }
        Ok(())
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    //! Covers form validation rules.

    use rstest::rstest;

    use super::*;
    use crate::domain::user::UserRole;

    #[rstest]
    #[case::title(IssueSubmission::new(" ", "d", "l"), "title")]
    #[case::description(IssueSubmission::new("t", "", "l"), "description")]
    #[case::location(IssueSubmission::new("t", "d", "\t"), "location")]
    fn submission_requires_every_field(
        #[case] submission: IssueSubmission,
        #[case] field: &'static str,
    ) {
        assert_eq!(
            submission.validate(),
            Err(ValidationError::MissingField { field })
        );
    }

    #[test]
    fn complete_submission_passes() {
        let submission =
            IssueSubmission::new("Pothole", "Deep", "Main St").with_image("data:image/png;base64,");
        assert_eq!(submission.validate(), Ok(()));
    }

    #[test]
    fn draft_requires_name() {
        let draft = UserDraft::new("", "123456789012", UserRole::Citizen);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField { field: "name" })
        );
    }

    #[test]
    fn draft_requires_identity_code() {
        let draft = UserDraft::new("Asha", "", UserRole::Citizen);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MissingField {
                field: "identity code"
            })
        );
    }

    #[rstest]
    #[case("12345678901")]
    #[case("12345678901x")]
    #[case("1234 5678 9012")]
    fn draft_rejects_malformed_codes(#[case] code: &str) {
        let draft = UserDraft::new("Asha", code, UserRole::Admin);
        assert_eq!(
            draft.validate(),
            Err(ValidationError::MalformedIdentityCode)
        );
    }

    #[test]
    fn well_formed_draft_passes() {
        let draft = UserDraft::new("Asha", "123456789012", UserRole::Citizen);
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn malformed_code_message_names_length() {
        assert_eq!(
            ValidationError::MalformedIdentityCode.to_string(),
            "identity code must be 12 digits"
        );
    }
}
