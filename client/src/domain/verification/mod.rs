//! Two-step email verification flow.
//!
//! The user enters an institutional email, receives a one-time code, and
//! submits it. A successful verification establishes the [`Session`] and
//! routes either to the main app or to profile setup, depending on whether
//! the backend reports the profile as complete.
//!
//! Submission is split into [`VerificationFlow::begin_submit`] and
//! [`VerificationFlow::complete`] so a UI can render the in-flight window
//! (disabled submit control); [`VerificationFlow::submit`] runs both around
//! a gateway call.

use std::fmt;

use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::error::ScreenError;
use crate::domain::navigation::Route;
use crate::domain::ports::{
    AuthGateway, GatewayError, SendCodeRequest, SendCodeResponse, VerifyCodeRequest,
    VerifyCodeResponse,
};
use crate::domain::session::{Email, EmailSuffix, Identity, Session};

/// Number of digits in a verification code.
pub const CODE_LENGTH: usize = 6;

/// Confirmation shown once the backend accepts a send-code request.
pub const CODE_SENT_MESSAGE: &str = "A verification code has been sent to your email.";

/// Validation errors for typed verification codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeValidationError {
    /// No code was typed.
    EmptyCode,
    /// Code is not exactly [`CODE_LENGTH`] ASCII digits.
    MalformedCode {
        /// Expected digit count.
        expected: usize,
    },
}

impl fmt::Display for CodeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyCode => write!(f, "Please enter the verification code."),
            Self::MalformedCode { expected } => {
                write!(f, "The verification code must be {expected} digits.")
            }
        }
    }
}

impl std::error::Error for CodeValidationError {}

impl From<CodeValidationError> for ScreenError {
    fn from(value: CodeValidationError) -> Self {
        Self::validation(value.to_string())
    }
}

/// One-time code typed by the user, wiped from memory on drop.
///
/// # Examples
/// ```
/// use client::domain::VerificationCode;
///
/// let code = VerificationCode::parse(" 123456 ").unwrap();
/// assert_eq!(code.as_str(), "123456");
/// assert!(VerificationCode::parse("12345").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct VerificationCode(Zeroizing<String>);

impl VerificationCode {
    /// Validate a typed code.
    pub fn parse(raw: &str) -> Result<Self, CodeValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CodeValidationError::EmptyCode);
        }
        if trimmed.len() != CODE_LENGTH || !trimmed.bytes().all(|byte| byte.is_ascii_digit()) {
            return Err(CodeValidationError::MalformedCode {
                expected: CODE_LENGTH,
            });
        }
        Ok(Self(Zeroizing::new(trimmed.to_owned())))
    }

    /// Code digits.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(..)")
    }
}

/// Externally visible step of the flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Collecting the email address.
    EnterEmail,
    /// Collecting the code sent to that address.
    EnterCode,
}

/// Status of the current verification attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptStatus {
    /// Nothing submitted yet.
    Idle,
    /// Send-code request outstanding.
    Sending,
    /// Backend accepted the send-code request.
    CodeSent,
    /// Verify-code request outstanding.
    Verifying,
    /// Code accepted; the session is established.
    Verified,
    /// Last submission failed locally or remotely.
    Failed,
}

impl AttemptStatus {
    fn is_in_flight(self) -> bool {
        matches!(self, Self::Sending | Self::Verifying)
    }
}

/// Request produced by [`VerificationFlow::begin_submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRequest {
    /// Ask for a code.
    SendCode(SendCodeRequest),
    /// Check a code.
    VerifyCode(VerifyCodeRequest),
}

impl AuthRequest {
    /// Run the request against a gateway.
    pub async fn dispatch<G>(&self, gateway: &G) -> Result<AuthReply, GatewayError>
    where
        G: AuthGateway + ?Sized,
    {
        match self {
            Self::SendCode(request) => gateway.send_code(request).await.map(AuthReply::CodeSent),
            Self::VerifyCode(request) => {
                gateway.verify_code(request).await.map(AuthReply::Verified)
            }
        }
    }
}

/// Successful gateway reply fed back into [`VerificationFlow::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthReply {
    /// Reply to [`AuthRequest::SendCode`].
    CodeSent(SendCodeResponse),
    /// Reply to [`AuthRequest::VerifyCode`].
    Verified(VerifyCodeResponse),
}

/// What a submission achieved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEvent {
    /// A request was already outstanding; nothing happened.
    Ignored,
    /// A code was sent; the flow now expects it.
    CodeSent {
        /// Confirmation to show the user.
        message: String,
    },
    /// Verification succeeded and the flow is finished.
    Routed(Route),
}

/// Verification flow controller.
#[derive(Debug)]
pub struct VerificationFlow {
    suffix: EmailSuffix,
    email_input: String,
    code_input: Zeroizing<String>,
    step: Step,
    status: AttemptStatus,
    attempt_email: Option<Email>,
    last_error: Option<ScreenError>,
}

impl VerificationFlow {
    /// Start a flow that accepts emails ending with `suffix`.
    pub fn new(suffix: EmailSuffix) -> Self {
        Self {
            suffix,
            email_input: String::new(),
            code_input: Zeroizing::new(String::new()),
            step: Step::EnterEmail,
            status: AttemptStatus::Idle,
            attempt_email: None,
            last_error: None,
        }
    }

    /// Current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Current attempt status.
    pub fn status(&self) -> AttemptStatus {
        self.status
    }

    /// Whether a request is outstanding (submit control disabled).
    pub fn is_busy(&self) -> bool {
        self.status.is_in_flight()
    }

    /// Email field contents.
    pub fn email_input(&self) -> &str {
        &self.email_input
    }

    /// Code field contents.
    pub fn code_input(&self) -> &str {
        self.code_input.as_str()
    }

    /// Error from the most recent submission, if it failed.
    pub fn last_error(&self) -> Option<&ScreenError> {
        self.last_error.as_ref()
    }

    /// Update the email field.
    ///
    /// Returns `false` and leaves the field alone once a code has been sent
    /// or while a request is outstanding.
    pub fn set_email(&mut self, value: impl Into<String>) -> bool {
        if self.step != Step::EnterEmail || self.is_busy() {
            return false;
        }
        self.email_input = value.into();
        true
    }

    /// Update the code field. Returns `false` outside [`Step::EnterCode`].
    pub fn set_code(&mut self, value: impl Into<String>) -> bool {
        if self.step != Step::EnterCode || self.is_busy() {
            return false;
        }
        self.code_input = Zeroizing::new(value.into());
        true
    }

    /// Validate the current step and produce the request to send.
    ///
    /// Returns `Ok(None)` when a request is already outstanding.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the email or code fails local checks;
    /// no request is produced in that case.
    pub fn begin_submit(&mut self) -> Result<Option<AuthRequest>, ScreenError> {
        if self.is_busy() {
            debug!(step = ?self.step, "submit ignored while a request is outstanding");
            return Ok(None);
        }
        let prepared = match self.step {
            Step::EnterEmail => self.prepare_send_code(),
            Step::EnterCode => self.prepare_verify_code(),
        };
        match prepared {
            Ok(request) => {
                self.last_error = None;
                Ok(Some(request))
            }
            Err(error) => Err(self.fail(error)),
        }
    }

    fn prepare_send_code(&mut self) -> Result<AuthRequest, ScreenError> {
        let email = Email::parse(&self.email_input, &self.suffix)?;
        self.attempt_email = Some(email.clone());
        self.status = AttemptStatus::Sending;
        Ok(AuthRequest::SendCode(SendCodeRequest { email }))
    }

    fn prepare_verify_code(&mut self) -> Result<AuthRequest, ScreenError> {
        let email = self
            .attempt_email
            .clone()
            .ok_or_else(|| ScreenError::validation("Please request a new code."))?;
        let code = VerificationCode::parse(self.code_input.as_str())?;
        self.status = AttemptStatus::Verifying;
        Ok(AuthRequest::VerifyCode(VerifyCodeRequest { email, code }))
    }

    /// Apply the gateway result for the outstanding request.
    ///
    /// A successful verification establishes `session`. Completions that
    /// arrive with no request outstanding are ignored.
    ///
    /// # Errors
    ///
    /// Returns a remote error when the gateway failed; field values are kept
    /// so the user can retry.
    pub fn complete(
        &mut self,
        session: &mut Session,
        result: Result<AuthReply, GatewayError>,
    ) -> Result<FlowEvent, ScreenError> {
        if !self.is_busy() {
            return Ok(FlowEvent::Ignored);
        }
        match (self.status, result) {
            (AttemptStatus::Sending, Ok(AuthReply::CodeSent(_))) => {
                self.step = Step::EnterCode;
                self.status = AttemptStatus::CodeSent;
                Ok(FlowEvent::CodeSent {
                    message: CODE_SENT_MESSAGE.to_owned(),
                })
            }
            (AttemptStatus::Verifying, Ok(AuthReply::Verified(response))) => {
                Ok(FlowEvent::Routed(self.finish(session, response)?))
            }
            (_, Ok(_)) => Err(self.fail(ScreenError::remote(""))),
            (_, Err(error)) => Err(self.fail(error.into())),
        }
    }

    fn finish(
        &mut self,
        session: &mut Session,
        response: VerifyCodeResponse,
    ) -> Result<Route, ScreenError> {
        let Some(email) = self.attempt_email.take() else {
            return Err(self.fail(ScreenError::validation("Please request a new code.")));
        };
        let identity = Identity::new(email).with_user_id(response.user_id);
        session.establish(identity.clone());
        self.status = AttemptStatus::Verified;
        self.code_input = Zeroizing::new(String::new());

        let route = if response.is_profile_complete {
            Route::Explore { identity }
        } else {
            Route::ProfileSetup {
                identity,
                new_user: true,
            }
        };
        info!(screen = route.screen(), "verification succeeded");
        Ok(route)
    }

    fn fail(&mut self, error: ScreenError) -> ScreenError {
        self.status = AttemptStatus::Failed;
        self.last_error = Some(error.clone());
        error
    }

    /// Validate, call the gateway, and apply the result.
    ///
    /// # Errors
    ///
    /// Returns validation errors without calling the gateway, and remote
    /// errors when the gateway fails.
    pub async fn submit<G>(
        &mut self,
        session: &mut Session,
        gateway: &G,
    ) -> Result<FlowEvent, ScreenError>
    where
        G: AuthGateway + ?Sized,
    {
        let Some(request) = self.begin_submit()? else {
            return Ok(FlowEvent::Ignored);
        };
        let result = request.dispatch(gateway).await;
        self.complete(session, result)
    }

    /// Clear the code and go back to email entry ("use a different email").
    ///
    /// Returns `false` while a request is outstanding.
    pub fn reset(&mut self) -> bool {
        if self.is_busy() {
            return false;
        }
        self.code_input = Zeroizing::new(String::new());
        self.step = Step::EnterEmail;
        self.status = AttemptStatus::Idle;
        self.attempt_email = None;
        self.last_error = None;
        true
    }
}

#[cfg(test)]
mod tests;
