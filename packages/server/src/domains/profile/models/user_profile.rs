use docstore::Document;
use serde::{Deserialize, Serialize};

/// A user's onboarding profile.
///
/// Fields this service does not interpret are kept in `extra` so a
/// read-modify-write never drops them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,

    /// Phone numbers, emails and UIDs the user has proven ownership of
    #[serde(default)]
    pub verified_identifiers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_email_address: Option<String>,
    #[serde(default)]
    pub secondary_phone_numbers: Vec<String>,
    #[serde(default)]
    pub secondary_email_addresses: Vec<String>,

    #[serde(flatten)]
    pub extra: Document,
}

impl UserProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.verified_identifiers.push(identifier.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn has_identifier(&self, identifier: &str) -> bool {
        self.verified_identifiers.iter().any(|i| i == identifier)
    }
}
