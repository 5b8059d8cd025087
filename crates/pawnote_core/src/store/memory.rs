//! In-memory document store.
//!
//! # Responsibility
//! - Provide the reference `DocumentStore` implementation for tests and
//!   embedded/dev callers.
//!
//! # Invariants
//! - One record per `(kind, id)` key; `put` replaces atomically under the
//!   store lock.

use super::{Document, DocumentStore, StoreResult};
use crate::model::entity::{EntityId, EntityKind};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

type DocumentMap = BTreeMap<(EntityKind, EntityId), Document>;

/// Map-backed document store guarded by a single lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<DocumentMap>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records of one kind. Test/diagnostic helper.
    pub fn count(&self, kind: EntityKind) -> usize {
        self.guard()
            .keys()
            .filter(|(stored_kind, _)| *stored_kind == kind)
            .count()
    }

    /// Total number of stored records across all kinds.
    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    // Map mutations are single insert/remove calls, so a poisoned guard
    // still holds a consistent snapshot; recover it instead of panicking.
    fn guard(&self) -> MutexGuard<'_, DocumentMap> {
        self.documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<Document>> {
        Ok(self.guard().get(&(kind, id)).cloned())
    }

    fn put(&self, document: &Document) -> StoreResult<()> {
        self.guard()
            .insert((document.kind(), document.id()), document.clone());
        Ok(())
    }

    fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<()> {
        self.guard().remove(&(kind, id));
        Ok(())
    }
}
