use docstore::Document;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PartnerType {
    Rider,
    Practitioner,
    Provider,
    Pharmaceutical,
    Coach,
    Nutrition,
    Consumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountType {
    Individual,
    Organisation,
}

/// A supplier account, linked to a user profile by `profile_id`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierProfile {
    pub id: String,

    #[serde(rename = "profileID", default)]
    pub profile_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partner_type: Option<PartnerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_type: Option<AccountType>,

    /// KYC answers as submitted; shape depends on partner and account type
    #[serde(rename = "supplierKYC", default)]
    pub supplier_kyc: Document,

    #[serde(flatten)]
    pub extra: Document,
}
