//! Wire-level tests for the OTP client against a mockito server.

use mockito::Matcher;
use otp_client::{OtpClient, OtpClientError, OtpOptions};
use serde_json::json;

fn client_for(server: &mockito::ServerGuard) -> OtpClient {
    OtpClient::new(OtpOptions::new(server.url())).unwrap()
}

#[tokio::test]
async fn test_send_otp_returns_code_from_json_string_body() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/internal/send_otp/")
        .match_body(Matcher::Json(json!({"msisdn": "+254700000000"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("\"482913\"")
        .expect(1)
        .create_async()
        .await;

    let code = client_for(&server).send_otp("+254700000000").await.unwrap();

    assert_eq!(code, "482913");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_retry_otp_sends_retry_step() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/internal/send_retry_otp/")
        .match_body(Matcher::Json(json!({"msisdn": "+254700000000", "retryStep": 2})))
        .with_status(200)
        .with_body("\"123456\"")
        .create_async()
        .await;

    let code = client_for(&server)
        .send_retry_otp("+254700000000", 2)
        .await
        .unwrap();

    assert_eq!(code, "123456");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_non_200_is_api_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/internal/send_retry_otp/")
        .with_status(400)
        .with_body("unsupported retry step")
        .create_async()
        .await;

    let err = client_for(&server)
        .send_retry_otp("+254700000000", 9)
        .await
        .unwrap_err();

    match err {
        OtpClientError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "unsupported retry step");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/internal/send_otp/")
        .with_status(200)
        .with_body("482913")
        .create_async()
        .await;

    let err = client_for(&server).send_otp("+254700000000").await.unwrap_err();

    // a bare number is valid JSON but not a string
    assert!(matches!(err, OtpClientError::Decode(_)));
}

#[tokio::test]
async fn test_verify_otp_reads_is_verified() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/internal/verify_otp/")
        .match_body(Matcher::Json(
            json!({"msisdn": "+254700000000", "verificationCode": "482913"}),
        ))
        .with_status(200)
        .with_body(r#"{"IsVerified": true}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/internal/verify_otp/")
        .match_body(Matcher::Json(
            json!({"msisdn": "+254700000000", "verificationCode": "000000"}),
        ))
        .with_status(200)
        .with_body(r#"{"IsVerified": false}"#)
        .create_async()
        .await;

    let client = client_for(&server);
    assert!(client.verify_otp("+254700000000", "482913").await.unwrap());
    assert!(!client.verify_otp("+254700000000", "000000").await.unwrap());
}

#[tokio::test]
async fn test_verify_email_otp_posts_email() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/internal/verify_email_otp/")
        .match_body(Matcher::Json(
            json!({"email": "mwas@example.com", "verificationCode": "777777"}),
        ))
        .with_status(200)
        .with_body(r#"{"IsVerified": true}"#)
        .create_async()
        .await;

    let verified = client_for(&server)
        .verify_email_otp("mwas@example.com", "777777")
        .await
        .unwrap();

    assert!(verified);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_verify_response_missing_field_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/internal/verify_otp/")
        .with_status(200)
        .with_body(r#"{"verified": "maybe"}"#)
        .create_async()
        .await;

    let err = client_for(&server)
        .verify_otp("+254700000000", "482913")
        .await
        .unwrap_err();

    assert!(matches!(err, OtpClientError::Decode(_)));
}

#[tokio::test]
async fn test_signing_key_adds_bearer_header() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/internal/send_otp/")
        .match_header("authorization", Matcher::Regex(r"^Bearer .+\..+\..+$".to_string()))
        .with_status(200)
        .with_body("\"111111\"")
        .create_async()
        .await;

    let client =
        OtpClient::new(OtpOptions::new(server.url()).with_signing_key("isc-secret")).unwrap();
    client.send_otp("+254700000000").await.unwrap();

    mock.assert_async().await;
}
