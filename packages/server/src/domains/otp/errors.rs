use otp_client::OtpClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OtpError {
    #[error("invalid phone number format: {phone:?}")]
    InvalidPhoneFormat { phone: String },

    #[error("failed to send OTP")]
    Dispatch(#[source] OtpClientError),

    #[error("failed to verify OTP")]
    Verification(#[source] OtpClientError),
}

pub type Result<T> = std::result::Result<T, OtpError>;
