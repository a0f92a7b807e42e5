//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::traits::DocumentStore;
use crate::types::{Document, DocumentRef, DocumentSnapshot, Filter};

/// Error returned when a fault has been injected into the store.
#[derive(Debug, thiserror::Error)]
#[error("injected fault: {0}")]
pub struct InjectedFault(&'static str);

/// In-memory document store.
///
/// Documents are kept per collection in insertion order, which is the order
/// `query_many` returns them in. Useful for testing and development. Not
/// suitable for production as data is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<(String, Document)>>>,
    pending_failures: AtomicUsize,
    writes_failing: AtomicBool,
    writes: AtomicUsize,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `n` operations (of any kind) fail with `Unavailable`.
    pub fn fail_next(&self, n: usize) {
        self.pending_failures.store(n, Ordering::SeqCst);
    }

    /// Make every create/update/delete fail with `Unavailable` until reset.
    pub fn set_writes_failing(&self, failing: bool) {
        self.writes_failing.store(failing, Ordering::SeqCst);
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Number of writes that changed stored data since construction.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// All documents of a collection, in insertion order.
    pub fn documents(&self, collection: &str) -> Vec<DocumentSnapshot> {
        self.collections
            .read()
            .unwrap()
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, data)| {
                        DocumentSnapshot::new(DocumentRef::new(collection, id), data.clone())
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn check_fault(&self) -> Result<()> {
        let injected = self
            .pending_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(StoreError::unavailable(InjectedFault("operation")));
        }
        Ok(())
    }

    fn check_write_fault(&self) -> Result<()> {
        self.check_fault()?;
        if self.writes_failing.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable(InjectedFault("write")));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query_many(&self, collection: &str, filter: &Filter) -> Result<Vec<DocumentSnapshot>> {
        self.check_fault()?;

        let collections = self.collections.read().unwrap();
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|(_, data)| filter.matches(data))
            .map(|(id, data)| DocumentSnapshot::new(DocumentRef::new(collection, id), data.clone()))
            .collect())
    }

    async fn get(&self, reference: &DocumentRef) -> Result<DocumentSnapshot> {
        self.check_fault()?;

        self.collections
            .read()
            .unwrap()
            .get(&reference.collection)
            .and_then(|docs| docs.iter().find(|(id, _)| id == &reference.id))
            .map(|(_, data)| DocumentSnapshot::new(reference.clone(), data.clone()))
            .ok_or_else(|| StoreError::NotFound {
                collection: reference.collection.clone(),
                id: reference.id.clone(),
            })
    }

    async fn create(&self, collection: &str, data: Document) -> Result<DocumentRef> {
        self.check_write_fault()?;

        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push((id.clone(), data));
        self.writes.fetch_add(1, Ordering::SeqCst);

        debug!(collection, id = %id, "Created document");
        Ok(DocumentRef::new(collection, id))
    }

    async fn update(&self, reference: &DocumentRef, data: Document) -> Result<()> {
        self.check_write_fault()?;

        let mut collections = self.collections.write().unwrap();
        let existing = collections
            .get_mut(&reference.collection)
            .and_then(|docs| docs.iter_mut().find(|(id, _)| id == &reference.id))
            .ok_or_else(|| StoreError::NotFound {
                collection: reference.collection.clone(),
                id: reference.id.clone(),
            })?;

        for (key, value) in data {
            existing.1.insert(key, value);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);

        debug!(reference = %reference, "Updated document");
        Ok(())
    }

    async fn delete(&self, reference: &DocumentRef) -> Result<()> {
        self.check_write_fault()?;

        let mut collections = self.collections.write().unwrap();
        let Some(docs) = collections.get_mut(&reference.collection) else {
            return Ok(());
        };

        let before = docs.len();
        docs.retain(|(id, _)| id != &reference.id);
        if docs.len() < before {
            self.writes.fetch_add(1, Ordering::SeqCst);
            debug!(reference = %reference, "Deleted document");
        }
        Ok(())
    }
}
