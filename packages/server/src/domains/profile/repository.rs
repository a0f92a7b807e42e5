//! Profile repository: onboarding business operations over the document store.
//!
//! Every operation is a short sequence of store primitives. Check-then-write
//! sequences (enrolment, username changes) are not atomic; two concurrent
//! callers can both pass the check. Duplicates that result are tolerated by
//! the readers below and logged, never repaired here.

use std::sync::Arc;

use docstore::{to_document, Document, DocumentRef, DocumentSnapshot, DocumentStore, Filter};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::errors::{ProfileError, Result};
use super::models::{CollectionNames, ExperimentParticipant, KycRequest, SupplierProfile, UserProfile};

pub struct ProfileRepository {
    store: Arc<dyn DocumentStore>,
    collections: CollectionNames,
}

impl ProfileRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collections: CollectionNames) -> Self {
        Self { store, collections }
    }

    pub fn collections(&self) -> &CollectionNames {
        &self.collections
    }

    // =========================================================================
    // User profiles
    // =========================================================================

    /// Profile whose verified identifiers contain `identifier`.
    #[instrument(skip(self))]
    pub async fn get_profile_by_identifier(&self, identifier: &str) -> Result<UserProfile> {
        let filter = Filter::array_contains_any("verifiedIdentifiers", [identifier]);
        let snapshot = self
            .single(&self.collections.user_profiles, &filter, "user profile")
            .await?;
        Ok(snapshot.data_to()?)
    }

    #[instrument(skip(self))]
    pub async fn get_profile_by_id(&self, id: &str) -> Result<UserProfile> {
        let snapshot = self.profile_snapshot(id).await?;
        Ok(snapshot.data_to()?)
    }

    /// Creates a profile for a freshly verified phone number.
    ///
    /// Fails with `Conflict` when the number already belongs to a profile,
    /// primary or secondary. The stored document is read back and returned.
    #[instrument(skip(self))]
    pub async fn create_user_profile(&self, phone: &str, uid: &str) -> Result<UserProfile> {
        if self.check_if_phone_number_exists(phone).await? {
            return Err(ProfileError::Conflict(format!(
                "phone number {} is already in use",
                phone
            )));
        }

        let mut profile = UserProfile::new(uuid::Uuid::new_v4().to_string()).with_identifier(uid);
        profile.primary_phone = Some(phone.to_string());
        profile
            .extra
            .insert("termsAccepted".to_string(), json!(true));
        profile.extra.insert("suspended".to_string(), json!(false));

        let reference = self
            .store
            .create(&self.collections.user_profiles, to_document(&profile)?)
            .await?;
        let created: UserProfile = self.read_back(&reference).await?;

        info!(profile_id = %created.id, "Created user profile");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_profile_by_primary_phone_number(&self, phone: &str) -> Result<UserProfile> {
        self.single_as(
            &self.collections.user_profiles,
            &Filter::eq("primaryPhone", phone),
            "user profile",
        )
        .await
    }

    /// Primary phone first, then the secondary phone list.
    #[instrument(skip(self))]
    pub async fn get_profile_by_phone_number(&self, phone: &str) -> Result<UserProfile> {
        match self.get_profile_by_primary_phone_number(phone).await {
            Err(ProfileError::NotFound(_)) => {}
            found => return found,
        }

        self.single_as(
            &self.collections.user_profiles,
            &Filter::array_contains("secondaryPhoneNumbers", phone),
            "user profile",
        )
        .await
    }

    /// Sets `userName` on profile `id`, unless another profile already uses it.
    #[instrument(skip(self))]
    pub async fn update_user_name(&self, id: &str, user_name: &str) -> Result<()> {
        let snapshot = self.profile_snapshot(id).await?;

        let holders = self
            .store
            .query_many(
                &self.collections.user_profiles,
                &Filter::eq("userName", user_name),
            )
            .await?;
        let taken = holders
            .iter()
            .any(|holder| holder.field("id").and_then(|v| v.as_str()) != Some(id));
        if taken {
            return Err(ProfileError::Conflict(format!(
                "username {} has already been taken",
                user_name
            )));
        }

        let mut patch = Document::new();
        patch.insert("userName".to_string(), json!(user_name));
        self.store.update(&snapshot.reference, patch).await?;

        info!(profile_id = %id, "Updated user name");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn check_if_username_exists(&self, user_name: &str) -> Result<bool> {
        self.exists(
            &self.collections.user_profiles,
            &Filter::eq("userName", user_name),
        )
        .await
    }

    /// Primary phone first, then the secondary phone list.
    #[instrument(skip(self))]
    pub async fn check_if_phone_number_exists(&self, phone: &str) -> Result<bool> {
        let collection = &self.collections.user_profiles;
        if self.exists(collection, &Filter::eq("primaryPhone", phone)).await? {
            return Ok(true);
        }
        self.exists(
            collection,
            &Filter::array_contains("secondaryPhoneNumbers", phone),
        )
        .await
    }

    /// Primary email first, then the secondary email list.
    #[instrument(skip(self))]
    pub async fn check_if_email_exists(&self, email: &str) -> Result<bool> {
        let collection = &self.collections.user_profiles;
        if self
            .exists(collection, &Filter::eq("primaryEmailAddress", email))
            .await?
        {
            return Ok(true);
        }
        self.exists(
            collection,
            &Filter::array_contains("secondaryEmailAddresses", email),
        )
        .await
    }

    // =========================================================================
    // Supplier profiles
    // =========================================================================

    /// Creates a supplier with no partner or account type yet, linked to `profile_id`.
    #[instrument(skip(self))]
    pub async fn create_empty_supplier_profile(&self, profile_id: &str) -> Result<SupplierProfile> {
        let supplier = SupplierProfile {
            id: uuid::Uuid::new_v4().to_string(),
            profile_id: profile_id.to_string(),
            ..Default::default()
        };

        let reference = self
            .store
            .create(&self.collections.supplier_profiles, to_document(&supplier)?)
            .await?;
        let created: SupplierProfile = self.read_back(&reference).await?;

        info!(supplier_id = %created.id, "Created empty supplier profile");
        Ok(created)
    }

    #[instrument(skip(self))]
    pub async fn get_supplier_profile_by_id(&self, id: &str) -> Result<SupplierProfile> {
        self.single_as(
            &self.collections.supplier_profiles,
            &Filter::eq("id", id),
            "supplier profile",
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn get_supplier_profile_by_profile_id(
        &self,
        profile_id: &str,
    ) -> Result<SupplierProfile> {
        self.single_as(
            &self.collections.supplier_profiles,
            &Filter::eq("profileID", profile_id),
            "supplier profile",
        )
        .await
    }

    // =========================================================================
    // Experiment participants
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn check_if_experiment_participant(&self, profile_id: &str) -> Result<bool> {
        self.exists(
            &self.collections.experiment_participants,
            &Filter::eq("profileID", profile_id),
        )
        .await
    }

    /// Enrolls `profile`. Returns true whether or not it was already enrolled.
    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    pub async fn add_experiment_participant(&self, profile: &UserProfile) -> Result<bool> {
        if self.check_if_experiment_participant(&profile.id).await? {
            debug!("Profile already enrolled");
            return Ok(true);
        }

        let participant = to_document(&ExperimentParticipant::enroll(&profile.id))?;
        self.store
            .create(&self.collections.experiment_participants, participant)
            .await?;

        info!("Enrolled experiment participant");
        Ok(true)
    }

    /// Unenrolls `profile`. Returns false when it was not enrolled.
    #[instrument(skip(self, profile), fields(profile_id = %profile.id))]
    pub async fn remove_experiment_participant(&self, profile: &UserProfile) -> Result<bool> {
        let enrolments = self
            .store
            .query_many(
                &self.collections.experiment_participants,
                &Filter::eq("profileID", profile.id.as_str()),
            )
            .await?;

        if enrolments.is_empty() {
            debug!("Profile not enrolled, nothing to remove");
            return Ok(false);
        }
        if enrolments.len() > 1 {
            warn!(
                count = enrolments.len(),
                "Duplicate experiment enrolments; removing all"
            );
        }

        for enrolment in &enrolments {
            self.store.delete(&enrolment.reference).await?;
        }

        info!("Removed experiment participant");
        Ok(true)
    }

    // =========================================================================
    // KYC processing
    // =========================================================================

    #[instrument(skip(self, request), fields(kyc_id = %request.id, supplier_id = %request.supplier_record.id))]
    pub async fn stage_kyc_processing_request(&self, request: &KycRequest) -> Result<()> {
        let document = to_document(request)?;
        self.store
            .create(&self.collections.kyc_processing, document)
            .await?;
        info!("Staged KYC processing request");
        Ok(())
    }

    /// Deletes the supplier's unprocessed request.
    #[instrument(skip(self))]
    pub async fn remove_kyc_processing_request(&self, supplier_id: &str) -> Result<()> {
        let filter = Filter::eq("supplierRecord.id", supplier_id).and_eq("processed", false);
        let pending = self
            .store
            .query_many(&self.collections.kyc_processing, &filter)
            .await?;

        let Some(first) = pending.first() else {
            return Err(ProfileError::NotFound(
                "no KYC processing request found".to_string(),
            ));
        };
        if pending.len() > 1 {
            warn!(
                count = pending.len(),
                "More than one unprocessed KYC request for supplier"
            );
        }

        self.store.delete(&first.reference).await?;
        info!("Removed KYC processing request");
        Ok(())
    }

    /// All requests still waiting for review.
    #[instrument(skip(self))]
    pub async fn fetch_kyc_processing_requests(&self) -> Result<Vec<KycRequest>> {
        let snapshots = self
            .store
            .query_many(
                &self.collections.kyc_processing,
                &Filter::eq("processed", false),
            )
            .await?;

        snapshots
            .iter()
            .map(|snapshot| snapshot.data_to().map_err(ProfileError::from))
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn fetch_kyc_processing_request_by_id(&self, id: &str) -> Result<KycRequest> {
        self.single_as(
            &self.collections.kyc_processing,
            &Filter::eq("id", id),
            "KYC processing request",
        )
        .await
    }

    /// Writes back a reviewed request, located by its id.
    #[instrument(skip(self, request), fields(kyc_id = %request.id, status = ?request.status))]
    pub async fn update_kyc_processing_request(&self, request: &KycRequest) -> Result<()> {
        let snapshot = self
            .single(
                &self.collections.kyc_processing,
                &Filter::eq("id", request.id.as_str()),
                "KYC processing request",
            )
            .await?;

        self.store
            .update(&snapshot.reference, to_document(request)?)
            .await?;
        info!("Updated KYC processing request");
        Ok(())
    }

    // =========================================================================
    // Nudges
    // =========================================================================

    /// Stores a nudge document as given.
    #[instrument(skip(self, nudge))]
    pub async fn stage_profile_nudge(&self, nudge: Document) -> Result<()> {
        self.store
            .create(&self.collections.profile_nudges, nudge)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn profile_snapshot(&self, id: &str) -> Result<DocumentSnapshot> {
        self.single(
            &self.collections.user_profiles,
            &Filter::eq("id", id),
            "user profile",
        )
        .await
    }

    async fn read_back<T: DeserializeOwned>(&self, reference: &DocumentRef) -> Result<T> {
        Ok(self.store.get(reference).await?.data_to()?)
    }

    async fn exists(&self, collection: &str, filter: &Filter) -> Result<bool> {
        Ok(!self.store.query_many(collection, filter).await?.is_empty())
    }

    async fn single_as<T: DeserializeOwned>(
        &self,
        collection: &str,
        filter: &Filter,
        subject: &str,
    ) -> Result<T> {
        let snapshot = self.single(collection, filter, subject).await?;
        Ok(snapshot.data_to()?)
    }

    /// First match for `filter`. Several matches break the one-record-per-subject
    /// rule; that is logged and the first one wins.
    async fn single(
        &self,
        collection: &str,
        filter: &Filter,
        subject: &str,
    ) -> Result<DocumentSnapshot> {
        let mut snapshots = self.store.query_many(collection, filter).await?;

        match snapshots.len() {
            0 => Err(ProfileError::NotFound(subject.to_string())),
            1 => Ok(snapshots.remove(0)),
            count => {
                warn!(
                    collection,
                    count,
                    subject,
                    "More than one document matched; using the first"
                );
                Ok(snapshots.remove(0))
            }
        }
    }
}
