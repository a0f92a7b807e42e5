use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use super::errors::{OtpError, Result};
use crate::common::PhoneNormalizer;
use crate::kernel::BaseOtpTransport;

/// A one-time code as issued by the OTP service. Never persisted here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Otp {
    pub code: String,
}

/// Sends and verifies one-time codes through the remote OTP service.
///
/// Retry step numbers select the fallback channel (1 is WhatsApp, 2 is
/// voice/SMS); their meaning belongs to the remote service and they are
/// passed through unchanged.
pub struct OtpDispatchService {
    transport: Arc<dyn BaseOtpTransport>,
    normalizer: PhoneNormalizer,
}

impl OtpDispatchService {
    pub fn new(transport: Arc<dyn BaseOtpTransport>, normalizer: PhoneNormalizer) -> Self {
        Self {
            transport,
            normalizer,
        }
    }

    /// Generates a code and sends it on the primary channel.
    #[instrument(skip(self))]
    pub async fn generate_and_send_otp(&self, phone: &str) -> Result<Otp> {
        let code = self.transport.send_otp(phone).await.map_err(|e| {
            error!(error = %e, "OTP dispatch failed");
            OtpError::Dispatch(e)
        })?;

        info!("OTP sent");
        Ok(Otp { code })
    }

    /// Re-sends a code on the fallback channel selected by `retry_step`.
    #[instrument(skip(self))]
    pub async fn send_retry_otp(&self, phone: &str, retry_step: i32) -> Result<Otp> {
        let msisdn = self.normalize(phone)?;

        let code = self
            .transport
            .send_retry_otp(&msisdn, retry_step)
            .await
            .map_err(|e| {
                error!(error = %e, "OTP retry dispatch failed");
                OtpError::Dispatch(e)
            })?;

        info!(%msisdn, "OTP re-sent");
        Ok(Otp { code })
    }

    #[instrument(skip(self, code))]
    pub async fn verify_otp(&self, phone: &str, code: &str) -> Result<bool> {
        let msisdn = self.normalize(phone)?;

        let verified = self
            .transport
            .verify_otp(&msisdn, code)
            .await
            .map_err(|e| {
                error!(error = %e, "OTP verification call failed");
                OtpError::Verification(e)
            })?;

        info!(%msisdn, verified, "OTP checked");
        Ok(verified)
    }

    #[instrument(skip(self, code))]
    pub async fn verify_email_otp(&self, email: &str, code: &str) -> Result<bool> {
        let verified = self
            .transport
            .verify_email_otp(email, code)
            .await
            .map_err(|e| {
                error!(error = %e, "Email OTP verification call failed");
                OtpError::Verification(e)
            })?;

        info!(verified, "Email OTP checked");
        Ok(verified)
    }

    fn normalize(&self, phone: &str) -> Result<String> {
        self.normalizer
            .normalize(phone)
            .map_err(|e| OtpError::InvalidPhoneFormat { phone: e.input })
    }
}
