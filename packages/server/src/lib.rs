// Onboarding profile core
//
// Repository layer for user, supplier, KYC and experiment-enrolment records,
// plus OTP dispatch through the OTP microservice.

pub mod common;
pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
