//! OTP domain - one-time code dispatch and verification
//!
//! Codes are generated, delivered and checked by the remote OTP service;
//! this side normalizes phone numbers and classifies failures.

pub mod errors;
pub mod service;

pub use errors::OtpError;
pub use service::{Otp, OtpDispatchService};
