pub mod collections;
pub mod kyc;
pub mod participant;
pub mod supplier;
pub mod user_profile;

pub use collections::CollectionNames;
pub use kyc::{KycRequest, KycStatus, OrganizationType};
pub use participant::ExperimentParticipant;
pub use supplier::{AccountType, PartnerType, SupplierProfile};
pub use user_profile::UserProfile;
