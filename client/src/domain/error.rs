//! Screen-level error types.
//!
//! Every failure a screen can report is one of two kinds: a local validation
//! failure that never reached the network, or a remote failure carrying the
//! message the user should see. Screens never panic on either.

use std::fmt;

use crate::domain::ports::GatewayError;

/// Message shown when the backend gives no usable error text.
pub const GENERIC_FAILURE_MESSAGE: &str = "An unexpected error occurred.";

/// Failure category reported alongside the user-visible message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input failed a client-side check; no request was sent.
    Validation,
    /// The backend rejected the request or could not be reached.
    Remote,
}

/// Error returned by screen operations.
///
/// ## Invariants
/// - `message` is never blank; blank input falls back to
///   [`GENERIC_FAILURE_MESSAGE`].
///
/// # Examples
/// ```
/// use client::domain::{ErrorKind, ScreenError};
///
/// let err = ScreenError::validation("Please enter your email.");
/// assert_eq!(err.kind(), ErrorKind::Validation);
/// assert_eq!(err.message(), "Please enter your email.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenError {
    kind: ErrorKind,
    message: String,
}

impl ScreenError {
    /// Create a new error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if message.trim().is_empty() {
            GENERIC_FAILURE_MESSAGE.to_owned()
        } else {
            message
        };
        Self { kind, message }
    }

    /// Convenience constructor for [`ErrorKind::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Convenience constructor for [`ErrorKind::Remote`].
    pub fn remote(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Remote, message)
    }

    /// Failure category.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Message to show the user.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether the failure was caught before any request was sent.
    pub fn is_validation(&self) -> bool {
        self.kind == ErrorKind::Validation
    }
}

impl fmt::Display for ScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ScreenError {}

impl From<GatewayError> for ScreenError {
    fn from(value: GatewayError) -> Self {
        Self::remote(value.user_message())
    }
}
