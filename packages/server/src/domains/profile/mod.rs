//! Profile domain - user, supplier, KYC and experiment enrolment records
//!
//! All reads and writes go through [`ProfileRepository`], which builds the
//! onboarding operations from `docstore` primitives.

pub mod errors;
pub mod models;
pub mod repository;

pub use errors::ProfileError;
pub use models::*;
pub use repository::ProfileRepository;
