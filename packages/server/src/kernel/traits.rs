// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (normalization, error classification) lives in the domains.
//
// Naming convention: Base* for trait names (e.g., BaseOtpTransport)

use async_trait::async_trait;
use otp_client::Result;

// =============================================================================
// OTP Transport Trait (Infrastructure)
// =============================================================================

/// Raw calls to the OTP microservice.
#[async_trait]
pub trait BaseOtpTransport: Send + Sync {
    /// Generate a code and send it on the primary channel; returns the code
    async fn send_otp(&self, msisdn: &str) -> Result<String>;

    /// Re-send on the fallback channel numbered `retry_step`; returns the code
    async fn send_retry_otp(&self, msisdn: &str, retry_step: i32) -> Result<String>;

    /// Check a code sent to a phone number
    async fn verify_otp(&self, msisdn: &str, code: &str) -> Result<bool>;

    /// Check a code sent to an email address
    async fn verify_email_otp(&self, email: &str, code: &str) -> Result<bool>;
}
