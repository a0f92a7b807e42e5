//! OTP dispatch over the scripted transport, and end to end through the
//! HTTP client against a mockito server.

mod common;

use common::*;
use mockito::Matcher;
use otp_client::{OtpClient, OtpClientError, OtpOptions};
use profile_core::common::PhoneNormalizer;
use profile_core::domains::otp::{OtpDispatchService, OtpError};
use profile_core::kernel::{MockOtpTransport, OtpCall, OtpClientAdapter};
use serde_json::json;
use std::error::Error as _;
use std::sync::Arc;

// ============================================================================
// Dispatch
// ============================================================================

#[tokio::test]
async fn test_generate_and_send_returns_generated_code() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().with_code("482913"));

    let otp = ctx.otp_service().generate_and_send_otp(PHONE).await.unwrap();

    assert_eq!(otp.code, "482913");
    assert_eq!(
        ctx.otp.calls(),
        vec![OtpCall::Send {
            msisdn: PHONE.to_string()
        }]
    );
}

#[tokio::test]
async fn test_send_failure_is_dispatch_error() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().failing_with(500, "sms gateway down"));

    let err = ctx
        .otp_service()
        .generate_and_send_otp(PHONE)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OtpError::Dispatch(OtpClientError::Api { status: 500, .. })
    ));
    assert!(err.source().is_some());
}

#[tokio::test]
async fn test_retry_with_empty_phone_never_reaches_transport() {
    let ctx = TestHarness::new();

    let err = ctx.otp_service().send_retry_otp("", 1).await.unwrap_err();

    assert!(matches!(err, OtpError::InvalidPhoneFormat { .. }));
    assert_eq!(ctx.otp.call_count(), 0);
}

#[tokio::test]
async fn test_retry_normalizes_phone_and_passes_step_through() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().with_code("654321"));

    let otp = ctx
        .otp_service()
        .send_retry_otp("0700 000 000", 2)
        .await
        .unwrap();

    assert_eq!(otp.code, "654321");
    assert_eq!(
        ctx.otp.calls(),
        vec![OtpCall::Retry {
            msisdn: PHONE.to_string(),
            retry_step: 2
        }]
    );
}

#[tokio::test]
async fn test_retry_rejection_is_dispatch_error() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().failing_with(400, "bad retry step"));

    let err = ctx
        .otp_service()
        .send_retry_otp(PHONE, 7)
        .await
        .unwrap_err();

    assert!(matches!(err, OtpError::Dispatch(_)));
}

// ============================================================================
// Verification
// ============================================================================

#[tokio::test]
async fn test_verify_phone_otp() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().accepting(PHONE, "482913"));

    assert!(ctx.otp_service().verify_otp(PHONE, "482913").await.unwrap());
    assert!(!ctx.otp_service().verify_otp(PHONE, "000000").await.unwrap());
}

#[tokio::test]
async fn test_verify_normalizes_phone() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().accepting(PHONE, "482913"));

    assert!(ctx
        .otp_service()
        .verify_otp("254-700-000-000", "482913")
        .await
        .unwrap());
    assert_eq!(
        ctx.otp.calls(),
        vec![OtpCall::Verify {
            msisdn: PHONE.to_string(),
            code: "482913".to_string()
        }]
    );
}

#[tokio::test]
async fn test_verify_invalid_phone_never_reaches_transport() {
    let ctx = TestHarness::new();

    let err = ctx
        .otp_service()
        .verify_otp("call me maybe", "482913")
        .await
        .unwrap_err();

    match err {
        OtpError::InvalidPhoneFormat { phone } => assert_eq!(phone, "call me maybe"),
        other => panic!("expected InvalidPhoneFormat, got {:?}", other),
    }
    assert_eq!(ctx.otp.call_count(), 0);
}

#[tokio::test]
async fn test_verify_transport_failure_is_verification_error() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().failing_with(503, "unavailable"));

    let err = ctx
        .otp_service()
        .verify_otp(PHONE, "482913")
        .await
        .unwrap_err();

    assert!(matches!(err, OtpError::Verification(_)));
}

#[tokio::test]
async fn test_verify_email_otp_is_not_normalized() {
    let ctx = TestHarness::with_otp(MockOtpTransport::new().accepting("Jane@Example.com", "111222"));

    assert!(ctx
        .otp_service()
        .verify_email_otp("Jane@Example.com", "111222")
        .await
        .unwrap());
    assert!(!ctx
        .otp_service()
        .verify_email_otp("jane@example.com", "111222")
        .await
        .unwrap());
}

// ============================================================================
// End to end through the HTTP client
// ============================================================================

fn http_service(server: &mockito::ServerGuard) -> OtpDispatchService {
    let client = OtpClient::new(OtpOptions::new(server.url()).with_signing_key("isc-secret"))
        .unwrap();
    OtpDispatchService::new(
        Arc::new(OtpClientAdapter::new(Arc::new(client))),
        PhoneNormalizer::default(),
    )
}

#[tokio::test]
async fn test_send_and_verify_over_http() {
    let mut server = mockito::Server::new_async().await;
    let send = server
        .mock("POST", "/internal/send_otp/")
        .match_header("authorization", Matcher::Regex("^Bearer .+".to_string()))
        .match_body(Matcher::Json(json!({"msisdn": PHONE})))
        .with_status(200)
        .with_body("\"482913\"")
        .expect(1)
        .create_async()
        .await;
    let accept = server
        .mock("POST", "/internal/verify_otp/")
        .match_body(Matcher::Json(
            json!({"msisdn": PHONE, "verificationCode": "482913"}),
        ))
        .with_status(200)
        .with_body(r#"{"IsVerified": true}"#)
        .create_async()
        .await;
    let reject = server
        .mock("POST", "/internal/verify_otp/")
        .match_body(Matcher::Json(
            json!({"msisdn": PHONE, "verificationCode": "000000"}),
        ))
        .with_status(200)
        .with_body(r#"{"IsVerified": false}"#)
        .create_async()
        .await;

    let service = http_service(&server);

    let otp = service.generate_and_send_otp(PHONE).await.unwrap();
    assert_eq!(otp.code, "482913");
    assert!(service.verify_otp(PHONE, "482913").await.unwrap());
    assert!(!service.verify_otp(PHONE, "000000").await.unwrap());

    send.assert_async().await;
    accept.assert_async().await;
    reject.assert_async().await;
}

#[tokio::test]
async fn test_malformed_verify_response_is_verification_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/internal/verify_email_otp/")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = http_service(&server)
        .verify_email_otp("jane@example.com", "111222")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OtpError::Verification(OtpClientError::Decode(_))
    ));
}
