//! Typed errors for document store operations.

use thiserror::Error;

/// Errors that can occur while talking to a document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Transport, auth or backend failure. Cancellations and timeouts land here too.
    #[error("document store unavailable: {0}")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A document reference did not resolve.
    #[error("document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    /// A single-document query matched nothing.
    #[error("no document in {collection} matches the filter")]
    NoMatch { collection: String },

    /// Stored document does not have the expected shape
    #[error("unable to decode document: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload is not a JSON object
    #[error("unable to encode document: {0}")]
    Encode(String),
}

impl StoreError {
    /// Wrap any backend error as `Unavailable`.
    pub fn unavailable<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable(Box::new(err))
    }

    /// True for both "reference missing" and "filter matched nothing".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoMatch { .. })
    }
}

/// Result type alias for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
