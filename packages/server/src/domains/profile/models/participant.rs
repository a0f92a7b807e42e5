use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Enrollment marker for the experiment programme. Existence means enrolled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentParticipant {
    #[serde(rename = "profileID")]
    pub profile_id: String,
    pub enrolled_at: DateTime<Utc>,
}

impl ExperimentParticipant {
    pub fn enroll(profile_id: impl Into<String>) -> Self {
        Self {
            profile_id: profile_id.into(),
            enrolled_at: Utc::now(),
        }
    }
}
