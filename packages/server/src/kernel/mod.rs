//! Kernel module - infrastructure traits, adapters and dependencies.

pub mod deps;
pub mod test_dependencies;
pub mod traits;

pub use deps::{connect_store, OtpClientAdapter, ProfileDeps};
pub use test_dependencies::{MockOtpTransport, OtpCall, TestDependencies};
pub use traits::*;
