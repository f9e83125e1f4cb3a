//! Tests for the verification flow controller.

use super::*;
use crate::domain::ErrorKind;
use crate::domain::ports::MockAuthGateway;
use crate::domain::session::UserId;
use rstest::{fixture, rstest};

const EMAIL: &str = "albert@ufl.edu";
const CODE: &str = "123456";

#[fixture]
fn flow() -> VerificationFlow {
    VerificationFlow::new(EmailSuffix::default())
}

fn gateway_accepting_send() -> MockAuthGateway {
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_send_code()
        .withf(|request: &SendCodeRequest| request.email.as_ref() == EMAIL)
        .times(1)
        .returning(|_| {
            Ok(SendCodeResponse {
                message: Some("sent".to_owned()),
            })
        });
    gateway
}

async fn flow_awaiting_code(mut flow: VerificationFlow) -> (VerificationFlow, Session) {
    let mut session = Session::new();
    assert!(flow.set_email(EMAIL));
    let event = flow
        .submit(&mut session, &gateway_accepting_send())
        .await
        .expect("send code should succeed");
    assert_eq!(
        event,
        FlowEvent::CodeSent {
            message: CODE_SENT_MESSAGE.to_owned()
        }
    );
    (flow, session)
}

fn verify_reply(complete: bool, user_id: Option<&str>) -> VerifyCodeResponse {
    VerifyCodeResponse {
        message: Some("verified".to_owned()),
        is_profile_complete: complete,
        user_id: user_id.map(|id| UserId::new(id).expect("user id")),
    }
}

#[rstest]
#[case("")]
#[case("albert@gmail.com")]
#[case("albert@ufl.edu.com")]
#[case("albert")]
#[tokio::test]
async fn disallowed_emails_fail_locally_without_network(
    mut flow: VerificationFlow,
    #[case] email: &str,
) {
    let gateway = MockAuthGateway::new();
    let mut session = Session::new();
    flow.set_email(email);

    let err = flow
        .submit(&mut session, &gateway)
        .await
        .expect_err("email must be rejected");

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(flow.step(), Step::EnterEmail);
    assert_eq!(flow.status(), AttemptStatus::Failed);
    assert_eq!(flow.last_error(), Some(&err));
    assert!(!session.is_signed_in());
}

#[rstest]
#[tokio::test]
async fn sent_code_moves_to_code_entry(flow: VerificationFlow) {
    let (flow, session) = flow_awaiting_code(flow).await;
    assert_eq!(flow.step(), Step::EnterCode);
    assert_eq!(flow.status(), AttemptStatus::CodeSent);
    assert!(!session.is_signed_in());
}

#[rstest]
#[case(Some("Too many requests"), "Too many requests")]
#[case(None, "An unexpected error occurred.")]
#[tokio::test]
async fn send_failure_surfaces_message_and_stays(
    mut flow: VerificationFlow,
    #[case] server_message: Option<&'static str>,
    #[case] expected: &str,
) {
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_send_code()
        .times(1)
        .returning(move |_| Err(GatewayError::rejected(429_u16, server_message.map(str::to_owned))));
    let mut session = Session::new();
    flow.set_email(EMAIL);

    let err = flow
        .submit(&mut session, &gateway)
        .await
        .expect_err("send should fail");

    assert_eq!(err.kind(), ErrorKind::Remote);
    assert_eq!(err.message(), expected);
    assert_eq!(flow.step(), Step::EnterEmail);
    assert_eq!(flow.email_input(), EMAIL);
    assert!(!flow.is_busy(), "submit control must be re-enabled");
}

#[rstest]
#[case(true)]
#[case(false)]
#[tokio::test]
async fn verification_routes_by_profile_completeness(
    flow: VerificationFlow,
    #[case] complete: bool,
) {
    let (mut flow, mut session) = flow_awaiting_code(flow).await;
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_verify_code()
        .withf(|request: &VerifyCodeRequest| {
            request.email.as_ref() == EMAIL && request.code.as_str() == CODE
        })
        .times(1)
        .returning(move |_| Ok(verify_reply(complete, Some("17"))));
    flow.set_code(CODE);

    let event = flow
        .submit(&mut session, &gateway)
        .await
        .expect("verify should succeed");

    let FlowEvent::Routed(route) = event else {
        panic!("expected a route, got {event:?}");
    };
    assert_eq!(route.identity().email().as_ref(), EMAIL);
    match (complete, &route) {
        (true, Route::Explore { .. }) => {}
        (false, Route::ProfileSetup { new_user, .. }) => assert!(*new_user),
        _ => panic!("unexpected route {route:?} for complete={complete}"),
    }
    let identity = session.identity().expect("session established");
    assert_eq!(identity.email().as_ref(), EMAIL);
    assert_eq!(identity.user_id().map(AsRef::as_ref), Some("17"));
    assert_eq!(flow.status(), AttemptStatus::Verified);
    assert_eq!(flow.code_input(), "");
}

#[rstest]
#[tokio::test]
async fn verify_failure_keeps_code_and_step(flow: VerificationFlow) {
    let (mut flow, mut session) = flow_awaiting_code(flow).await;
    let mut gateway = MockAuthGateway::new();
    gateway
        .expect_verify_code()
        .times(1)
        .returning(|_| Err(GatewayError::rejected(400_u16, Some("Invalid code".to_owned()))));
    flow.set_code(CODE);

    let err = flow
        .submit(&mut session, &gateway)
        .await
        .expect_err("verify should fail");

    assert_eq!(err.message(), "Invalid code");
    assert_eq!(flow.step(), Step::EnterCode);
    assert_eq!(flow.code_input(), CODE);
    assert!(!flow.is_busy());
    assert!(!session.is_signed_in());
}

#[rstest]
#[case("", "Please enter the verification code.")]
#[case("12345", "The verification code must be 6 digits.")]
#[case("12a456", "The verification code must be 6 digits.")]
#[tokio::test]
async fn malformed_codes_fail_locally(
    flow: VerificationFlow,
    #[case] code: &str,
    #[case] expected: &str,
) {
    let (mut flow, mut session) = flow_awaiting_code(flow).await;
    let gateway = MockAuthGateway::new();
    flow.set_code(code);

    let err = flow
        .submit(&mut session, &gateway)
        .await
        .expect_err("code must be rejected");

    assert!(err.is_validation());
    assert_eq!(err.message(), expected);
    assert_eq!(flow.step(), Step::EnterCode);
}

#[rstest]
#[case("")]
#[case("12")]
#[case("999999")]
#[tokio::test]
async fn reset_always_clears_code_and_returns_to_email(
    flow: VerificationFlow,
    #[case] typed: &str,
) {
    let (mut flow, _session) = flow_awaiting_code(flow).await;
    flow.set_code(typed);

    assert!(flow.reset());

    assert_eq!(flow.step(), Step::EnterEmail);
    assert_eq!(flow.code_input(), "");
    assert_eq!(flow.status(), AttemptStatus::Idle);
    assert!(flow.set_email("other@ufl.edu"), "email is editable again");
}

#[rstest]
fn second_submit_while_in_flight_is_a_no_op(mut flow: VerificationFlow) {
    flow.set_email(EMAIL);
    let first = flow.begin_submit().expect("valid email");
    assert!(matches!(first, Some(AuthRequest::SendCode(_))));
    assert!(flow.is_busy());

    let second = flow.begin_submit().expect("no validation while busy");
    assert!(second.is_none());
    assert!(!flow.reset(), "reset is disabled while a request is outstanding");
    assert!(!flow.set_email("x@ufl.edu"));
}

#[rstest]
fn completion_without_outstanding_request_is_ignored(mut flow: VerificationFlow) {
    let mut session = Session::new();
    let event = flow
        .complete(
            &mut session,
            Ok(AuthReply::Verified(verify_reply(true, None))),
        )
        .expect("stale completion is ignored");
    assert_eq!(event, FlowEvent::Ignored);
    assert!(!session.is_signed_in());
}

#[rstest]
#[tokio::test]
async fn email_is_locked_during_code_entry(flow: VerificationFlow) {
    let (mut flow, _session) = flow_awaiting_code(flow).await;
    assert!(!flow.set_email("other@ufl.edu"));
    assert_eq!(flow.email_input(), EMAIL);
}

#[test]
fn code_debug_output_is_redacted() {
    let code = VerificationCode::parse(CODE).expect("code");
    assert_eq!(format!("{code:?}"), "VerificationCode(..)");
}
