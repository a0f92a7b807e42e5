//! Test harness for repository and OTP dispatch tests.
//!
//! `TestHarness` wires the in-memory store and the scripted OTP transport.
//! `PostgresHarness` runs the same repository against a shared PostgreSQL
//! container that is started once per test binary.

#![allow(dead_code)]

use anyhow::{Context, Result};
use docstore::{DocumentStore, MemoryStore, PostgresStore};
use profile_core::domains::otp::OtpDispatchService;
use profile_core::domains::profile::{CollectionNames, ProfileRepository};
use profile_core::kernel::{MockOtpTransport, ProfileDeps, TestDependencies};
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// In-memory harness. Each test gets a fresh store and transport.
///
/// ```ignore
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &TestHarness) {
///     let profile = ctx.profiles().get_profile_by_id("p-1").await;
/// }
/// ```
pub struct TestHarness {
    pub store: Arc<MemoryStore>,
    pub otp: Arc<MockOtpTransport>,
    pub deps: ProfileDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // Store is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        Self::from_deps(TestDependencies::new())
    }

    pub fn with_otp(otp: MockOtpTransport) -> Self {
        Self::from_deps(TestDependencies::new().mock_otp(otp))
    }

    pub fn from_deps(test_deps: TestDependencies) -> Self {
        init_tracing();
        let store = test_deps.store.clone();
        let otp = test_deps.otp.clone();
        Self {
            store,
            otp,
            deps: test_deps.into_deps(),
        }
    }

    pub fn profiles(&self) -> &ProfileRepository {
        &self.deps.profiles
    }

    pub fn otp_service(&self) -> &OtpDispatchService {
        &self.deps.otp
    }

    pub fn collections(&self) -> &CollectionNames {
        self.deps.profiles.collections()
    }
}

// =============================================================================
// PostgreSQL
// =============================================================================

/// Keeps the container alive for the whole test run.
struct SharedPostgres {
    db_url: String,
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_POSTGRES: OnceCell<SharedPostgres> = OnceCell::const_new();

impl SharedPostgres {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?;
        let port = postgres.get_host_port_ipv4(5432).await?;
        let db_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        Ok(Self {
            db_url,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_POSTGRES
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared Postgres container")
            })
            .await
    }
}

pub struct PostgresHarness {
    pub store: Arc<dyn DocumentStore>,
    pub profiles: ProfileRepository,
}

impl PostgresHarness {
    /// Collections are suffixed with `suffix` so tests sharing the
    /// container never see each other's documents.
    pub async fn new(suffix: &str) -> Result<Self> {
        let infra = SharedPostgres::get().await;
        let store: Arc<dyn DocumentStore> = Arc::new(
            PostgresStore::new(&infra.db_url, 2)
                .await
                .context("Failed to connect to test database")?,
        );

        Ok(Self {
            profiles: ProfileRepository::new(
                store.clone(),
                CollectionNames::with_suffix(Some(suffix)),
            ),
            store,
        })
    }
}
