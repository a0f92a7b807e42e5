//! Seed documents for repository tests.

#![allow(dead_code)]

use docstore::{to_document, DocumentRef, DocumentStore};
use profile_core::domains::profile::{
    AccountType, CollectionNames, KycRequest, PartnerType, SupplierProfile, UserProfile,
};
use serde_json::json;

pub const PHONE: &str = "+254700000000";

pub fn profile(id: &str, identifier: &str) -> UserProfile {
    UserProfile::new(id).with_identifier(identifier)
}

pub fn supplier(id: &str, profile_id: &str) -> SupplierProfile {
    let mut kyc = docstore::Document::new();
    kyc.insert("identificationDocNumber".to_string(), json!("12345678"));
    SupplierProfile {
        id: id.to_string(),
        profile_id: profile_id.to_string(),
        partner_type: Some(PartnerType::Practitioner),
        account_type: Some(AccountType::Individual),
        supplier_kyc: kyc,
        ..Default::default()
    }
}

pub async fn seed_profile(
    store: &dyn DocumentStore,
    collections: &CollectionNames,
    profile: &UserProfile,
) -> DocumentRef {
    store
        .create(&collections.user_profiles, to_document(profile).unwrap())
        .await
        .unwrap()
}

pub async fn seed_supplier(
    store: &dyn DocumentStore,
    collections: &CollectionNames,
    supplier: &SupplierProfile,
) -> DocumentRef {
    store
        .create(&collections.supplier_profiles, to_document(supplier).unwrap())
        .await
        .unwrap()
}

pub async fn seed_processed_kyc(
    store: &dyn DocumentStore,
    collections: &CollectionNames,
    supplier: &SupplierProfile,
) -> KycRequest {
    let mut request = KycRequest::pending(supplier);
    request.approve();
    store
        .create(&collections.kyc_processing, to_document(&request).unwrap())
        .await
        .unwrap();
    request
}
