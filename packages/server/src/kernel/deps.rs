// ProfileDeps - shared dependencies for the profile and OTP domains
//
// Built once at startup and shared behind Arc.

use anyhow::{Context, Result};
use async_trait::async_trait;
use docstore::{DocumentStore, PostgresStore};
use otp_client::{OtpClient, OtpOptions};
use std::sync::Arc;
use tracing::info;

use crate::common::PhoneNormalizer;
use crate::config::{Config, DatabaseConfig};
use crate::domains::otp::OtpDispatchService;
use crate::domains::profile::{CollectionNames, ProfileRepository};
use crate::kernel::BaseOtpTransport;

// =============================================================================
// OtpClient Adapter (implements BaseOtpTransport trait)
// =============================================================================

/// Wrapper around OtpClient that implements BaseOtpTransport trait
pub struct OtpClientAdapter(pub Arc<OtpClient>);

impl OtpClientAdapter {
    pub fn new(client: Arc<OtpClient>) -> Self {
        Self(client)
    }
}

#[async_trait]
impl BaseOtpTransport for OtpClientAdapter {
    async fn send_otp(&self, msisdn: &str) -> otp_client::Result<String> {
        self.0.send_otp(msisdn).await
    }

    async fn send_retry_otp(&self, msisdn: &str, retry_step: i32) -> otp_client::Result<String> {
        self.0.send_retry_otp(msisdn, retry_step).await
    }

    async fn verify_otp(&self, msisdn: &str, code: &str) -> otp_client::Result<bool> {
        self.0.verify_otp(msisdn, code).await
    }

    async fn verify_email_otp(&self, email: &str, code: &str) -> otp_client::Result<bool> {
        self.0.verify_email_otp(email, code).await
    }
}

/// Connect to PostgreSQL; the document schema is created if missing.
pub async fn connect_store(database: &DatabaseConfig) -> Result<PostgresStore> {
    PostgresStore::new(&database.url, database.max_connections)
        .await
        .context("Failed to connect to document store")
}

// =============================================================================
// ProfileDeps
// =============================================================================

#[derive(Clone)]
pub struct ProfileDeps {
    pub store: Arc<dyn DocumentStore>,
    pub profiles: Arc<ProfileRepository>,
    pub otp: Arc<OtpDispatchService>,
}

impl ProfileDeps {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        transport: Arc<dyn BaseOtpTransport>,
        collections: CollectionNames,
        normalizer: PhoneNormalizer,
    ) -> Self {
        Self {
            profiles: Arc::new(ProfileRepository::new(store.clone(), collections)),
            otp: Arc::new(OtpDispatchService::new(transport, normalizer)),
            store,
        }
    }

    /// Connect to PostgreSQL and the OTP service as configured.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = connect_store(&config.database).await?;

        let mut options =
            OtpOptions::new(&config.otp_service_url).with_timeout(config.otp_request_timeout);
        if let Some(key) = &config.isc_signing_key {
            options = options.with_signing_key(key);
        }
        let client = OtpClient::new(options).context("Failed to build OTP client")?;

        let collections = CollectionNames::with_suffix(config.collection_suffix());
        info!(
            user_profiles = %collections.user_profiles,
            otp_service = %config.otp_service_url,
            "Profile dependencies ready"
        );

        Ok(Self::new(
            Arc::new(store),
            Arc::new(OtpClientAdapter::new(Arc::new(client))),
            collections,
            PhoneNormalizer::new(config.default_country_code.clone()),
        ))
    }
}
