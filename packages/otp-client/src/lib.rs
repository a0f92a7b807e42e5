// Inter-service client for the OTP microservice.
//
// The remote service owns code generation, expiry, attempt counting and
// channel selection. This client only moves requests and responses.

pub mod error;
pub mod models;

use std::time::Duration;

use jsonwebtoken::{encode, EncodingKey, Header};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

pub use error::{OtpClientError, Result};
use crate::models::{
    IscClaims, OtpVerifyResponse, SendOtpRequest, SendRetryOtpRequest, VerifyEmailOtpRequest,
    VerifyOtpRequest,
};

/// OTP service endpoints
pub const SEND_OTP: &str = "internal/send_otp/";
pub const SEND_RETRY_OTP: &str = "internal/send_retry_otp/";
pub const VERIFY_OTP: &str = "internal/verify_otp/";
pub const VERIFY_EMAIL_OTP: &str = "internal/verify_email_otp/";

/// Lifetime of a signed inter-service token.
const TOKEN_TTL_MINUTES: i64 = 5;

#[derive(Debug, Clone)]
pub struct OtpOptions {
    /// Base URL of the OTP service, e.g. `https://otp.internal/`.
    pub base_url: String,
    /// Shared secret for the inter-service bearer token. No header is sent when unset.
    pub signing_key: Option<String>,
    /// Name this service signs tokens as.
    pub issuer: String,
    /// Per-request deadline.
    pub timeout: Duration,
}

impl OtpOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            signing_key: None,
            issuer: "profile".to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(key.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct OtpClient {
    client: Client,
    options: OtpOptions,
}

impl OtpClient {
    pub fn new(options: OtpOptions) -> Result<Self> {
        let client = Client::builder().timeout(options.timeout).build()?;
        Ok(Self { client, options })
    }

    /// Generate a code and send it over the primary channel. Returns the code.
    pub async fn send_otp(&self, msisdn: &str) -> Result<String> {
        self.post(SEND_OTP, &SendOtpRequest { msisdn }).await
    }

    /// Generate a code and send it over the fallback channel picked by `retry_step`.
    pub async fn send_retry_otp(&self, msisdn: &str, retry_step: i32) -> Result<String> {
        self.post(SEND_RETRY_OTP, &SendRetryOtpRequest { msisdn, retry_step })
            .await
    }

    pub async fn verify_otp(&self, msisdn: &str, code: &str) -> Result<bool> {
        let response: OtpVerifyResponse = self
            .post(
                VERIFY_OTP,
                &VerifyOtpRequest {
                    msisdn,
                    verification_code: code,
                },
            )
            .await?;
        Ok(response.is_verified)
    }

    pub async fn verify_email_otp(&self, email: &str, code: &str) -> Result<bool> {
        let response: OtpVerifyResponse = self
            .post(
                VERIFY_EMAIL_OTP,
                &VerifyEmailOtpRequest {
                    email,
                    verification_code: code,
                },
            )
            .await?;
        Ok(response.is_verified)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.options.base_url.trim_end_matches('/'), path)
    }

    fn bearer_token(&self) -> Result<Option<String>> {
        let Some(key) = &self.options.signing_key else {
            return Ok(None);
        };

        let now = chrono::Utc::now();
        let claims = IscClaims {
            iss: self.options.issuer.clone(),
            sub: "otp".to_string(),
            iat: now.timestamp(),
            exp: (now + chrono::Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )?;
        Ok(Some(token))
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(url = %url, "Calling OTP service");

        let mut request = self.client.post(&url).json(body);
        if let Some(token) = self.bearer_token()? {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status != StatusCode::OK {
            let message = response.text().await.unwrap_or_default();
            warn!(url = %url, status = status.as_u16(), "OTP service returned an error");
            return Err(OtpClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = OtpClient::new(OtpOptions::new("http://otp.local/")).unwrap();
        assert_eq!(
            client.endpoint(SEND_OTP),
            "http://otp.local/internal/send_otp/"
        );

        let client = OtpClient::new(OtpOptions::new("http://otp.local")).unwrap();
        assert_eq!(
            client.endpoint(VERIFY_EMAIL_OTP),
            "http://otp.local/internal/verify_email_otp/"
        );
    }

    #[test]
    fn test_no_token_without_signing_key() {
        let client = OtpClient::new(OtpOptions::new("http://otp.local")).unwrap();
        assert!(client.bearer_token().unwrap().is_none());
    }

    #[test]
    fn test_token_is_signed_with_shared_key() {
        let client =
            OtpClient::new(OtpOptions::new("http://otp.local").with_signing_key("isc-secret"))
                .unwrap();

        let token = client.bearer_token().unwrap().unwrap();
        let claims = decode::<IscClaims>(
            &token,
            &DecodingKey::from_secret(b"isc-secret"),
            &Validation::default(),
        )
        .unwrap()
        .claims;

        assert_eq!(claims.iss, "profile");
        assert_eq!(claims.sub, "otp");
        assert!(claims.exp > claims.iat);
    }
}
