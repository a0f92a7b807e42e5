pub const USER_PROFILES: &str = "user_profiles";
pub const SUPPLIER_PROFILES: &str = "supplier_profiles";
pub const PROFILE_NUDGES: &str = "profile_nudges";
pub const KYC_PROCESSING: &str = "kyc_processing";
pub const EXPERIMENT_PARTICIPANTS: &str = "experiment_participants";

/// Resolved collection names for one deployment environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionNames {
    pub user_profiles: String,
    pub supplier_profiles: String,
    pub profile_nudges: String,
    pub kyc_processing: String,
    pub experiment_participants: String,
}

impl Default for CollectionNames {
    fn default() -> Self {
        Self::with_suffix(None)
    }
}

impl CollectionNames {
    /// `with_suffix(Some("staging"))` yields `user_profiles_staging` and so on.
    pub fn with_suffix(suffix: Option<&str>) -> Self {
        let name = |base: &str| match suffix {
            Some(suffix) if !suffix.is_empty() => format!("{}_{}", base, suffix),
            _ => base.to_string(),
        };

        Self {
            user_profiles: name(USER_PROFILES),
            supplier_profiles: name(SUPPLIER_PROFILES),
            profile_nudges: name(PROFILE_NUDGES),
            kyc_processing: name(KYC_PROCESSING),
            experiment_participants: name(EXPERIMENT_PARTICIPANTS),
        }
    }
}
