//! Driven port for the email verification endpoints.

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::session::{Email, UserId};
use crate::domain::verification::VerificationCode;

/// Request a verification code for an email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeRequest {
    /// Address the code is delivered to.
    pub email: Email,
}

/// Backend acknowledgement of a sent code.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SendCodeResponse {
    /// Optional human-readable acknowledgement.
    pub message: Option<String>,
}

/// Submit a code for verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyCodeRequest {
    /// Address the code was sent to.
    pub email: Email,
    /// Code typed by the user.
    pub code: VerificationCode,
}

/// Outcome of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VerifyCodeResponse {
    /// Optional human-readable acknowledgement.
    pub message: Option<String>,
    /// Whether the backend considers the profile fully populated.
    pub is_profile_complete: bool,
    /// Backend identifier, when a user record exists.
    pub user_id: Option<UserId>,
}

/// Port for issuing and checking verification codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Ask the backend to email a verification code.
    async fn send_code(&self, request: &SendCodeRequest)
    -> Result<SendCodeResponse, GatewayError>;

    /// Check a code previously sent to the email.
    async fn verify_code(
        &self,
        request: &VerifyCodeRequest,
    ) -> Result<VerifyCodeResponse, GatewayError>;
}
