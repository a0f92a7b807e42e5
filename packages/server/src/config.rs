use anyhow::{Context, Result};
use docstore::stores::postgres::DEFAULT_MAX_CONNECTIONS;
use dotenvy::dotenv;
use std::env;
use std::time::Duration;

/// Document store connection settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Load only the database settings; enough for schema migration.
    pub fn from_env() -> Result<Self> {
        let _ = dotenv();

        Ok(Self {
            url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            max_connections: match env::var("DATABASE_MAX_CONNECTIONS") {
                Ok(value) => value
                    .parse()
                    .context("DATABASE_MAX_CONNECTIONS must be a valid number")?,
                Err(_) => DEFAULT_MAX_CONNECTIONS,
            },
        })
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub otp_service_url: String,
    pub isc_signing_key: Option<String>,
    pub otp_request_timeout: Duration,
    pub default_country_code: String,
    /// Deployment environment; anything other than production suffixes collection names.
    pub environment: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            database: DatabaseConfig::from_env()?,
            otp_service_url: env::var("OTP_SERVICE_URL").context("OTP_SERVICE_URL must be set")?,
            isc_signing_key: env::var("ISC_SIGNING_KEY").ok(),
            otp_request_timeout: Duration::from_secs(
                env::var("OTP_REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .context("OTP_REQUEST_TIMEOUT_SECS must be a valid number")?,
            ),
            default_country_code: env::var("DEFAULT_COUNTRY_CODE")
                .unwrap_or_else(|_| "254".to_string()),
            environment: env::var("ENVIRONMENT").ok().filter(|e| !e.is_empty()),
        })
    }

    /// Suffix appended to every collection name, if any.
    pub fn collection_suffix(&self) -> Option<&str> {
        self.environment
            .as_deref()
            .filter(|env| !env.eq_ignore_ascii_case("production"))
    }
}
