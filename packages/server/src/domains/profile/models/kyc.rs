use docstore::Document;
use serde::{Deserialize, Serialize};

use super::supplier::{PartnerType, SupplierProfile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrganizationType {
    LimitedCompany,
    Trust,
    University,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

/// A supplier's KYC submission waiting for (or past) review.
///
/// `supplier_record` is a snapshot taken at staging time, not a live link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KycRequest {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_partner_type: Option<PartnerType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_organization_type: Option<OrganizationType>,

    #[serde(default)]
    pub req_raw: Document,

    #[serde(default)]
    pub processed: bool,

    #[serde(default)]
    pub status: KycStatus,

    pub supplier_record: SupplierProfile,

    /// Serialized as null when absent so an approval clears an earlier rejection
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

impl KycRequest {
    /// A fresh, unprocessed request for `supplier` with a generated id.
    pub fn pending(supplier: &SupplierProfile) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            req_partner_type: supplier.partner_type,
            req_organization_type: None,
            req_raw: supplier.supplier_kyc.clone(),
            processed: false,
            status: KycStatus::Pending,
            supplier_record: supplier.clone(),
            rejection_reason: None,
        }
    }

    pub fn with_organization_type(mut self, organization_type: OrganizationType) -> Self {
        self.req_organization_type = Some(organization_type);
        self
    }

    pub fn approve(&mut self) {
        self.processed = true;
        self.status = KycStatus::Approved;
        self.rejection_reason = None;
    }

    pub fn reject(&mut self, reason: impl Into<String>) {
        self.processed = true;
        self.status = KycStatus::Rejected;
        self.rejection_reason = Some(reason.into());
    }
}
