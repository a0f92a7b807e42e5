use docstore::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    /// The store failed; the cause is kept as the error source.
    #[error("profile store failure")]
    Internal(#[source] StoreError),
}

impl ProfileError {
    /// HTTP status a caller would typically map this error to.
    pub fn status_hint(&self) -> u16 {
        match self {
            ProfileError::NotFound(_) => 404,
            ProfileError::Conflict(_) => 409,
            ProfileError::Internal(_) => 503,
        }
    }
}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        ProfileError::Internal(err)
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
