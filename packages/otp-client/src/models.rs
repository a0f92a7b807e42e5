use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct SendOtpRequest<'a> {
    pub msisdn: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendRetryOtpRequest<'a> {
    pub msisdn: &'a str,
    #[serde(rename = "retryStep")]
    pub retry_step: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyOtpRequest<'a> {
    pub msisdn: &'a str,
    #[serde(rename = "verificationCode")]
    pub verification_code: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyEmailOtpRequest<'a> {
    pub email: &'a str,
    #[serde(rename = "verificationCode")]
    pub verification_code: &'a str,
}

/// Body of both verify endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct OtpVerifyResponse {
    #[serde(rename = "IsVerified")]
    pub is_verified: bool,
}

/// Claims carried by the inter-service bearer token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IscClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}
