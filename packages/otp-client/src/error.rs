use thiserror::Error;

/// Errors returned by the OTP service client.
#[derive(Debug, Error)]
pub enum OtpClientError {
    /// Transport failure: connect, timeout, TLS, body read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-200 status.
    #[error("OTP service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The 200 body did not have the expected shape.
    #[error("unable to decode OTP service response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The inter-service bearer token could not be signed.
    #[error("unable to sign inter-service token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

pub type Result<T> = std::result::Result<T, OtpClientError>;
