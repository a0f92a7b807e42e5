// TestDependencies - mock implementations for testing
//
// Provides an in-memory store and a scripted OTP transport that can be
// injected into ProfileDeps for tests.

use async_trait::async_trait;
use docstore::MemoryStore;
use otp_client::OtpClientError;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{BaseOtpTransport, ProfileDeps};
use crate::common::PhoneNormalizer;
use crate::domains::profile::CollectionNames;

// =============================================================================
// Mock OTP Transport
// =============================================================================

/// One call made against the mock transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCall {
    Send { msisdn: String },
    Retry { msisdn: String, retry_step: i32 },
    Verify { msisdn: String, code: String },
    VerifyEmail { email: String, code: String },
}

pub struct MockOtpTransport {
    code: Mutex<String>,
    /// Accepted (recipient, code) pairs; everything else verifies false
    accepted: Mutex<HashMap<String, String>>,
    /// When set, every call fails with this status and message
    failure: Mutex<Option<(u16, String)>>,
    calls: Arc<Mutex<Vec<OtpCall>>>,
}

impl MockOtpTransport {
    pub fn new() -> Self {
        Self {
            code: Mutex::new("123456".to_string()),
            accepted: Mutex::new(HashMap::new()),
            failure: Mutex::new(None),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Code returned by send and retry calls
    pub fn with_code(self, code: &str) -> Self {
        *self.code.lock().unwrap() = code.to_string();
        self
    }

    /// Make `code` verify true for `recipient` (phone or email)
    pub fn accepting(self, recipient: &str, code: &str) -> Self {
        self.accepted
            .lock()
            .unwrap()
            .insert(recipient.to_string(), code.to_string());
        self
    }

    /// Fail every call as if the service answered with `status`
    pub fn failing_with(self, status: u16, message: &str) -> Self {
        *self.failure.lock().unwrap() = Some((status, message.to_string()));
        self
    }

    /// Get all calls in order
    pub fn calls(&self) -> Vec<OtpCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: OtpCall) -> otp_client::Result<()> {
        self.calls.lock().unwrap().push(call);
        match self.failure.lock().unwrap().as_ref() {
            Some((status, message)) => Err(OtpClientError::Api {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }

    fn is_accepted(&self, recipient: &str, code: &str) -> bool {
        self.accepted
            .lock()
            .unwrap()
            .get(recipient)
            .is_some_and(|expected| expected == code)
    }
}

impl Default for MockOtpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseOtpTransport for MockOtpTransport {
    async fn send_otp(&self, msisdn: &str) -> otp_client::Result<String> {
        self.record(OtpCall::Send {
            msisdn: msisdn.to_string(),
        })?;
        Ok(self.code.lock().unwrap().clone())
    }

    async fn send_retry_otp(&self, msisdn: &str, retry_step: i32) -> otp_client::Result<String> {
        self.record(OtpCall::Retry {
            msisdn: msisdn.to_string(),
            retry_step,
        })?;
        Ok(self.code.lock().unwrap().clone())
    }

    async fn verify_otp(&self, msisdn: &str, code: &str) -> otp_client::Result<bool> {
        self.record(OtpCall::Verify {
            msisdn: msisdn.to_string(),
            code: code.to_string(),
        })?;
        Ok(self.is_accepted(msisdn, code))
    }

    async fn verify_email_otp(&self, email: &str, code: &str) -> otp_client::Result<bool> {
        self.record(OtpCall::VerifyEmail {
            email: email.to_string(),
            code: code.to_string(),
        })?;
        Ok(self.is_accepted(email, code))
    }
}

// =============================================================================
// Test Dependencies Builder
// =============================================================================

pub struct TestDependencies {
    pub store: Arc<MemoryStore>,
    pub otp: Arc<MockOtpTransport>,
    pub collections: CollectionNames,
    pub normalizer: PhoneNormalizer,
}

impl TestDependencies {
    pub fn new() -> Self {
        Self {
            store: Arc::new(MemoryStore::new()),
            otp: Arc::new(MockOtpTransport::new()),
            collections: CollectionNames::default(),
            normalizer: PhoneNormalizer::default(),
        }
    }

    /// Set a mock OTP transport
    pub fn mock_otp(mut self, otp: MockOtpTransport) -> Self {
        self.otp = Arc::new(otp);
        self
    }

    /// Suffix collection names as a non-production environment would
    pub fn environment(mut self, suffix: &str) -> Self {
        self.collections = CollectionNames::with_suffix(Some(suffix));
        self
    }

    /// Convert into ProfileDeps for testing
    pub fn into_deps(self) -> ProfileDeps {
        ProfileDeps::new(self.store, self.otp, self.collections, self.normalizer)
    }
}

impl Default for TestDependencies {
    fn default() -> Self {
        Self::new()
    }
}
