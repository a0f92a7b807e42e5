//! The store seam.
//!
//! Repositories depend on `DocumentStore` only, so the remote backend can be
//! swapped (PostgreSQL in production, `MemoryStore` in tests).

use async_trait::async_trait;

use crate::error::{Result, StoreError};
use crate::types::{Document, DocumentRef, DocumentSnapshot, Filter};

/// Collection-scoped query/create/update/delete against a schemaless store.
///
/// Every write is atomic per document. Nothing here spans documents, so a
/// "query, then create" sequence in a caller is not atomic.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents in `collection` matching `filter`, in store order.
    ///
    /// Returns an empty vec (not an error) when nothing matches.
    async fn query_many(&self, collection: &str, filter: &Filter) -> Result<Vec<DocumentSnapshot>>;

    /// First document matching `filter`, or `StoreError::NoMatch`.
    async fn query_one(&self, collection: &str, filter: &Filter) -> Result<DocumentSnapshot> {
        self.query_many(collection, filter)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NoMatch {
                collection: collection.to_string(),
            })
    }

    /// Fetch a document by reference, or `StoreError::NotFound`.
    async fn get(&self, reference: &DocumentRef) -> Result<DocumentSnapshot>;

    /// Persist a new document; the store assigns its id.
    ///
    /// Equivalent payloads produce distinct documents.
    async fn create(&self, collection: &str, data: Document) -> Result<DocumentRef>;

    /// Merge `data` into an existing document. Top-level fields absent from
    /// `data` are preserved.
    async fn update(&self, reference: &DocumentRef, data: Document) -> Result<()>;

    /// Remove a document. Deleting a missing reference is not an error.
    async fn delete(&self, reference: &DocumentRef) -> Result<()>;
}
