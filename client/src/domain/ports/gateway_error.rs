//! Port error shared by every backend gateway.

use super::define_port_error;
use crate::domain::error::GENERIC_FAILURE_MESSAGE;

define_port_error! {
    /// Errors surfaced while calling the StudBud backend.
    pub enum GatewayError {
        /// Backend answered with a non-success status.
        Rejected {
            /// HTTP status code.
            status: u16,
            /// Value of the `error` field in the response body, if any.
            message: Option<String>,
        } => "backend rejected request with status {status}",
        /// Request never produced a response.
        Transport {
            /// Transport failure description.
            message: String,
        } => "backend transport failed: {message}",
        /// Response body could not be decoded.
        Decode {
            /// Decoder failure description.
            message: String,
        } => "backend response decode failed: {message}",
    }
}

impl GatewayError {
    /// Message to surface to the user.
    ///
    /// Only a backend-provided `error` string is shown verbatim; everything
    /// else collapses to [`GENERIC_FAILURE_MESSAGE`].
    ///
    /// # Examples
    /// ```
    /// use client::domain::ports::GatewayError;
    ///
    /// let err = GatewayError::rejected(400_u16, Some("Invalid code".to_owned()));
    /// assert_eq!(err.user_message(), "Invalid code");
    /// assert_eq!(
    ///     GatewayError::transport("dns").user_message(),
    ///     "An unexpected error occurred."
    /// );
    /// ```
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => message.as_str(),
            _ => GENERIC_FAILURE_MESSAGE,
        }
    }
}
