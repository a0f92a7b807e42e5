//! Collection-scoped document store abstraction.
//!
//! A thin, generic layer over a schemaless document store: query-many,
//! query-one, get, create, update (merge) and delete, parameterized by
//! collection name, filter predicates and payload. No business logic lives
//! here; repositories build their invariants on top of these primitives.
//!
//! # Usage
//!
//! ```rust,ignore
//! use docstore::{DocumentStore, Filter, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let reference = store.create("user_profiles", document).await?;
//! let matches = store
//!     .query_many("user_profiles", &Filter::array_contains_any("verifiedIdentifiers", ["+254700000000"]))
//!     .await?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - The `DocumentStore` seam
//! - [`types`] - Documents, references, snapshots and filters
//! - [`stores`] - Backends (MemoryStore, PostgresStore)

pub mod error;
pub mod stores;
pub mod traits;
pub mod types;

pub use error::{Result, StoreError};
pub use stores::MemoryStore;
#[cfg(feature = "postgres")]
pub use stores::PostgresStore;
pub use traits::DocumentStore;
pub use types::{
    lookup_path, to_document, Condition, Document, DocumentRef, DocumentSnapshot, Filter, Operator,
};
