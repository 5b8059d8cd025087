//! Document store port and implementations.
//!
//! # Responsibility
//! - Define the persistence contract the graph services are written against:
//!   id-based lookup, whole-record save, id-based delete.
//! - Keep storage details (SQLite, in-memory map) behind this boundary.
//!
//! # Invariants
//! - Each operation is atomic per single record; no cross-record
//!   transactions are offered here.
//! - `delete` of an absent record is a no-op, so delete requests tolerate
//!   at-least-once delivery.

use crate::db::DbError;
use crate::model::entity::{EntityId, EntityKind, Folder, Note, Pet, Task, User};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum StoreError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// Document body could not be serialized or deserialized.
    Serialization(serde_json::Error),
    /// Persisted state cannot be converted to a valid record.
    InvalidData(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Serialization(err) => write!(f, "document serialization failed: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted document: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialization(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization(value)
    }
}

/// One persisted record, tagged with its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Document {
    User(User),
    Folder(Folder),
    Note(Note),
    Task(Task),
    Pet(Pet),
}

impl Document {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::User(_) => EntityKind::User,
            Self::Folder(_) => EntityKind::Folder,
            Self::Note(_) => EntityKind::Note,
            Self::Task(_) => EntityKind::Task,
            Self::Pet(_) => EntityKind::Pet,
        }
    }

    pub fn id(&self) -> EntityId {
        match self {
            Self::User(user) => user.uuid,
            Self::Folder(folder) => folder.uuid,
            Self::Note(note) => note.uuid,
            Self::Task(task) => task.uuid,
            Self::Pet(pet) => pet.uuid,
        }
    }
}

impl From<User> for Document {
    fn from(value: User) -> Self {
        Self::User(value)
    }
}

impl From<Folder> for Document {
    fn from(value: Folder) -> Self {
        Self::Folder(value)
    }
}

impl From<Note> for Document {
    fn from(value: Note) -> Self {
        Self::Note(value)
    }
}

impl From<Task> for Document {
    fn from(value: Task) -> Self {
        Self::Task(value)
    }
}

impl From<Pet> for Document {
    fn from(value: Pet) -> Self {
        Self::Pet(value)
    }
}

/// Persistence contract consumed by graph services.
pub trait DocumentStore {
    /// Loads one record by kind and id. Absent records are `None`.
    fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<Document>>;
    /// Saves one record, replacing any previous version atomically.
    fn put(&self, document: &Document) -> StoreResult<()>;
    /// Deletes one record. Deleting an absent record is a no-op.
    fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<()>;
}

// Shared references delegate, so several services can borrow one store.
impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<Document>> {
        (**self).get(kind, id)
    }

    fn put(&self, document: &Document) -> StoreResult<()> {
        (**self).put(document)
    }

    fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<()> {
        (**self).delete(kind, id)
    }
}

/// Loads a user record, rejecting kind-mismatched documents.
pub fn get_user<S: DocumentStore + ?Sized>(store: &S, id: EntityId) -> StoreResult<Option<User>> {
    match store.get(EntityKind::User, id)? {
        None => Ok(None),
        Some(Document::User(user)) => Ok(Some(user)),
        Some(other) => Err(kind_mismatch(EntityKind::User, &other)),
    }
}

/// Loads a folder record, rejecting kind-mismatched documents.
pub fn get_folder<S: DocumentStore + ?Sized>(
    store: &S,
    id: EntityId,
) -> StoreResult<Option<Folder>> {
    match store.get(EntityKind::Folder, id)? {
        None => Ok(None),
        Some(Document::Folder(folder)) => Ok(Some(folder)),
        Some(other) => Err(kind_mismatch(EntityKind::Folder, &other)),
    }
}

/// Loads a note record, rejecting kind-mismatched documents.
pub fn get_note<S: DocumentStore + ?Sized>(store: &S, id: EntityId) -> StoreResult<Option<Note>> {
    match store.get(EntityKind::Note, id)? {
        None => Ok(None),
        Some(Document::Note(note)) => Ok(Some(note)),
        Some(other) => Err(kind_mismatch(EntityKind::Note, &other)),
    }
}

/// Loads a task record, rejecting kind-mismatched documents.
pub fn get_task<S: DocumentStore + ?Sized>(store: &S, id: EntityId) -> StoreResult<Option<Task>> {
    match store.get(EntityKind::Task, id)? {
        None => Ok(None),
        Some(Document::Task(task)) => Ok(Some(task)),
        Some(other) => Err(kind_mismatch(EntityKind::Task, &other)),
    }
}

/// Loads a pet record, rejecting kind-mismatched documents.
pub fn get_pet<S: DocumentStore + ?Sized>(store: &S, id: EntityId) -> StoreResult<Option<Pet>> {
    match store.get(EntityKind::Pet, id)? {
        None => Ok(None),
        Some(Document::Pet(pet)) => Ok(Some(pet)),
        Some(other) => Err(kind_mismatch(EntityKind::Pet, &other)),
    }
}

fn kind_mismatch(expected: EntityKind, found: &Document) -> StoreError {
    StoreError::InvalidData(format!(
        "expected {expected} document for {}, found {}",
        found.id(),
        found.kind()
    ))
}
