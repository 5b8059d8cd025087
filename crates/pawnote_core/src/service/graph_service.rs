//! Ownership graph operations over the document port.
//!
//! # Responsibility
//! - Provide attach/detach for each parent→child relation of the graph
//!   (User→Folder, Folder→Note, Note→Task) and the single User→Pet link.
//!
//! # Invariants
//! - Attaching an already-present child id is a no-op, not an error.
//! - Detaching an absent child id is a no-op, not an error.
//! - Every operation fails with `ParentNotFound` when the parent id does
//!   not resolve.

use crate::model::entity::{EntityId, EntityKind, User};
use crate::store::{self, Document, DocumentStore, StoreError, StoreResult};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from ownership graph mutations.
#[derive(Debug)]
pub enum GraphError {
    /// Parent record does not resolve through the store.
    ParentNotFound { kind: EntityKind, id: EntityId },
    /// The user already owns a different pet.
    PetAlreadySet {
        user: EntityId,
        existing: EntityId,
    },
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParentNotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::PetAlreadySet { user, existing } => {
                write!(f, "user {user} already owns pet {existing}")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GraphError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for GraphError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Attach/detach facade over one document store.
pub struct OwnershipGraph<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> OwnershipGraph<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Appends a folder id to the user's folder list (idempotent).
    pub fn attach_folder(&self, user_id: EntityId, folder_id: EntityId) -> Result<(), GraphError> {
        let mut user = self.require_user(user_id)?;
        user.attach_folder(folder_id);
        self.store.put(&Document::User(user))?;
        Ok(())
    }

    /// Pulls a folder id out of the user's folder list (idempotent).
    pub fn detach_folder(&self, user_id: EntityId, folder_id: EntityId) -> Result<(), GraphError> {
        let mut user = self.require_user(user_id)?;
        user.detach_folder(folder_id);
        self.store.put(&Document::User(user))?;
        Ok(())
    }

    /// Appends a note id to the folder's note list (idempotent).
    pub fn attach_note(&self, folder_id: EntityId, note_id: EntityId) -> Result<(), GraphError> {
        let mut folder = store::get_folder(&self.store, folder_id)?.ok_or(
            GraphError::ParentNotFound {
                kind: EntityKind::Folder,
                id: folder_id,
            },
        )?;
        folder.attach_note(note_id);
        self.store.put(&Document::Folder(folder))?;
        Ok(())
    }

    /// Pulls a note id out of the folder's note list (idempotent).
    pub fn detach_note(&self, folder_id: EntityId, note_id: EntityId) -> Result<(), GraphError> {
        let mut folder = store::get_folder(&self.store, folder_id)?.ok_or(
            GraphError::ParentNotFound {
                kind: EntityKind::Folder,
                id: folder_id,
            },
        )?;
        folder.detach_note(note_id);
        self.store.put(&Document::Folder(folder))?;
        Ok(())
    }

    /// Appends a task id to the note's task list (idempotent).
    pub fn attach_task(&self, note_id: EntityId, task_id: EntityId) -> Result<(), GraphError> {
        let mut note =
            store::get_note(&self.store, note_id)?.ok_or(GraphError::ParentNotFound {
                kind: EntityKind::Note,
                id: note_id,
            })?;
        note.attach_task(task_id);
        self.store.put(&Document::Note(note))?;
        Ok(())
    }

    /// Pulls a task id out of the note's task list (idempotent).
    pub fn detach_task(&self, note_id: EntityId, task_id: EntityId) -> Result<(), GraphError> {
        let mut note =
            store::get_note(&self.store, note_id)?.ok_or(GraphError::ParentNotFound {
                kind: EntityKind::Note,
                id: note_id,
            })?;
        note.detach_task(task_id);
        self.store.put(&Document::Note(note))?;
        Ok(())
    }

    /// Sets the user's single pet reference.
    ///
    /// Setting the same pet id again is a no-op; a different existing pet
    /// is an invariant violation surfaced as `PetAlreadySet`.
    pub fn set_pet(&self, user_id: EntityId, pet_id: EntityId) -> Result<(), GraphError> {
        let mut user = self.require_user(user_id)?;
        match user.pet {
            Some(existing) if existing == pet_id => return Ok(()),
            Some(existing) => {
                return Err(GraphError::PetAlreadySet {
                    user: user_id,
                    existing,
                })
            }
            None => {}
        }
        user.pet = Some(pet_id);
        self.store.put(&Document::User(user))?;
        Ok(())
    }

    /// Clears the user's pet reference if it points at `pet_id` (idempotent).
    pub fn clear_pet(&self, user_id: EntityId, pet_id: EntityId) -> Result<(), GraphError> {
        let mut user = self.require_user(user_id)?;
        if user.pet != Some(pet_id) {
            return Ok(());
        }
        user.pet = None;
        self.store.put(&Document::User(user))?;
        Ok(())
    }

    fn require_user(&self, user_id: EntityId) -> Result<User, GraphError> {
        store::get_user(&self.store, user_id)?.ok_or(GraphError::ParentNotFound {
            kind: EntityKind::User,
            id: user_id,
        })
    }
}
