//! Screen controllers and the types they share.
//!
//! Purpose: hold the client-side behaviour of each screen (form state,
//! validation, request shaping, navigation decisions) independent of any UI
//! toolkit or HTTP library. Backend access goes through the traits in
//! [`ports`].
//!
//! Public surface:
//! - `Session` / `Identity`: who is signed in, lent to every screen.
//! - `VerificationFlow`: email and code sign-in.
//! - `ProfileForm`, `PostForm`: form screens built on [`form::Form`].
//! - `ExploreScreen`: post browsing with stale-response protection.
//! - `ScreenError`: validation and remote failures.

pub mod error;
pub mod explore;
pub mod form;
pub mod navigation;
pub mod ports;
pub mod post;
pub mod profile;
pub mod session;
pub mod verification;

pub use self::error::{ErrorKind, GENERIC_FAILURE_MESSAGE, ScreenError};
pub use self::explore::{ExploreQuery, ExploreScreen, ExploreView, FetchOutcome, PendingFetch};
pub use self::navigation::Route;
pub use self::post::PostForm;
pub use self::profile::{ProfileForm, ProfileMode, ProfileSaved};
pub use self::session::{
    DEFAULT_EMAIL_SUFFIX, Email, EmailSuffix, Identity, IdentityValidationError, Session, UserId,
};
pub use self::verification::{
    AttemptStatus, AuthReply, AuthRequest, CodeValidationError, FlowEvent, Step, VerificationCode,
    VerificationFlow,
};

/// Convenient screen result alias.
///
/// # Examples
/// ```
/// use client::domain::{ScreenError, ScreenResult};
///
/// fn guard(name: &str) -> ScreenResult<()> {
///     if name.is_empty() {
///         return Err(ScreenError::validation("Please fill in all fields."));
///     }
///     Ok(())
/// }
/// assert!(guard("").is_err());
/// ```
pub type ScreenResult<T> = Result<T, ScreenError>;
