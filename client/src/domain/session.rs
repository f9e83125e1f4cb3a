//! Signed-in identity and the session that carries it between screens.
//!
//! The session is an explicit value owned by the caller and lent to each
//! screen. It is populated once verification succeeds and emptied on logout;
//! nothing is persisted across process restarts.

use std::fmt;

use crate::domain::error::ScreenError;

/// Institutional suffix required when no override is configured.
pub const DEFAULT_EMAIL_SUFFIX: &str = "@ufl.edu";

/// Validation errors for identity values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email does not end with the institutional suffix.
    DisallowedSuffix {
        /// Suffix the email was checked against.
        suffix: String,
    },
    /// User identifier was blank.
    EmptyUserId,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "Please enter your email."),
            Self::DisallowedSuffix { suffix } => {
                write!(f, "Please use a valid {suffix} email address.")
            }
            Self::EmptyUserId => write!(f, "user id must not be empty"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

impl From<IdentityValidationError> for ScreenError {
    fn from(value: IdentityValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

/// Institutional email domain suffix, such as `@ufl.edu`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSuffix(String);

impl EmailSuffix {
    /// Build a suffix, prefixing `@` when the caller passed a bare domain.
    pub fn new(suffix: impl AsRef<str>) -> Self {
        let trimmed = suffix.as_ref().trim().to_lowercase();
        if trimmed.starts_with('@') {
            Self(trimmed)
        } else {
            Self(format!("@{trimmed}"))
        }
    }

    /// Suffix text including the leading `@`.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Default for EmailSuffix {
    fn default() -> Self {
        Self(DEFAULT_EMAIL_SUFFIX.to_owned())
    }
}

impl fmt::Display for EmailSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Institutional email address identifying a user.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - Ends with the institutional suffix, compared case-insensitively.
///
/// # Examples
/// ```
/// use client::domain::{Email, EmailSuffix};
///
/// let suffix = EmailSuffix::default();
/// let email = Email::parse(" albert@ufl.edu ", &suffix).unwrap();
/// assert_eq!(email.as_ref(), "albert@ufl.edu");
/// assert!(Email::parse("albert@gmail.com", &suffix).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    /// Validate raw input against the institutional suffix.
    pub fn parse(raw: &str, suffix: &EmailSuffix) -> Result<Self, IdentityValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityValidationError::EmptyEmail);
        }
        if !trimmed.to_lowercase().ends_with(suffix.as_str()) {
            return Err(IdentityValidationError::DisallowedSuffix {
                suffix: suffix.as_str().to_owned(),
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque identifier the backend assigns once a profile exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UserId(String);

impl UserId {
    /// Wrap a backend identifier, rejecting blank values.
    pub fn new(id: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(IdentityValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The minimal user reference carried between screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    email: Email,
    user_id: Option<UserId>,
}

impl Identity {
    /// Identity known only by email.
    pub fn new(email: Email) -> Self {
        Self {
            email,
            user_id: None,
        }
    }

    /// Attach a backend identifier.
    #[must_use]
    pub fn with_user_id(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Email used as the routing key for backend calls.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Backend identifier, when already known.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }
}

/// Session context lent to every screen that needs the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    identity: Option<Identity>,
}

impl Session {
    /// Empty session, as at process start.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the identity produced by a successful verification.
    pub fn establish(&mut self, identity: Identity) {
        self.identity = Some(identity);
    }

    /// Signed-in identity, or a validation error when nobody is signed in.
    pub fn identity(&self) -> Result<&Identity, ScreenError> {
        self.identity
            .as_ref()
            .ok_or_else(|| ScreenError::validation("No signed-in user. Please sign in again."))
    }

    /// Whether an identity is present.
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    /// Cache a backend identifier resolved after sign-in.
    ///
    /// Does nothing when the session is empty.
    pub fn remember_user_id(&mut self, user_id: UserId) {
        if let Some(identity) = self.identity.as_mut() {
            identity.user_id = Some(user_id);
        }
    }

    /// Drop the identity (logout).
    pub fn clear(&mut self) {
        self.identity = None;
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn suffix() -> EmailSuffix {
        EmailSuffix::default()
    }

    #[rstest]
    #[case("", IdentityValidationError::EmptyEmail)]
    #[case("   ", IdentityValidationError::EmptyEmail)]
    #[case("gator@gmail.com", IdentityValidationError::DisallowedSuffix { suffix: "@ufl.edu".to_owned() })]
    #[case("gator@ufl.edu.evil.com", IdentityValidationError::DisallowedSuffix { suffix: "@ufl.edu".to_owned() })]
    #[case("gatorufl.edu", IdentityValidationError::DisallowedSuffix { suffix: "@ufl.edu".to_owned() })]
    fn rejects_non_institutional_email(
        suffix: EmailSuffix,
        #[case] raw: &str,
        #[case] expected: IdentityValidationError,
    ) {
        let err = Email::parse(raw, &suffix).expect_err("email must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case("albert@ufl.edu", "albert@ufl.edu")]
    #[case("  Albert@UFL.EDU ", "Albert@UFL.EDU")]
    fn accepts_suffix_case_insensitively(
        suffix: EmailSuffix,
        #[case] raw: &str,
        #[case] expected: &str,
    ) {
        let email = Email::parse(raw, &suffix).expect("email should parse");
        assert_eq!(email.as_ref(), expected);
    }

    #[rstest]
    #[case("ufl.edu", "@ufl.edu")]
    #[case(" @Example.EDU ", "@example.edu")]
    fn suffix_normalises_leading_at(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(EmailSuffix::new(raw).as_str(), expected);
    }

    #[test]
    fn suffix_message_names_the_domain() {
        let err = IdentityValidationError::DisallowedSuffix {
            suffix: "@ufl.edu".to_owned(),
        };
        assert_eq!(err.to_string(), "Please use a valid @ufl.edu email address.");
    }

    #[rstest]
    fn empty_session_reports_validation_error() {
        let session = Session::new();
        let err = session.identity().expect_err("no identity yet");
        assert!(err.is_validation());
        assert!(!session.is_signed_in());
    }

    #[rstest]
    fn session_lifecycle_establish_remember_clear(suffix: EmailSuffix) {
        let mut session = Session::new();
        let email = Email::parse("albert@ufl.edu", &suffix).expect("email");
        session.establish(Identity::new(email.clone()));
        session.remember_user_id(UserId::new("42").expect("user id"));

        let identity = session.identity().expect("identity");
        assert_eq!(identity.email(), &email);
        assert_eq!(identity.user_id().map(AsRef::as_ref), Some("42"));

        session.clear();
        assert!(session.identity().is_err());
    }

    #[test]
    fn remember_user_id_on_empty_session_is_ignored() {
        let mut session = Session::new();
        session.remember_user_id(UserId::new("7").expect("user id"));
        assert!(!session.is_signed_in());
    }

    #[rstest]
    #[case("")]
    #[case("  ")]
    fn blank_user_ids_are_rejected(#[case] raw: &str) {
        assert_eq!(UserId::new(raw), Err(IdentityValidationError::EmptyUserId));
    }
}
