//! Cascade consistency coordinator.
//!
//! # Responsibility
//! - Guarantee that deleting any node of the ownership tree removes every
//!   descendant and leaves no dangling reference in any child list.
//!
//! # Invariants
//! - Children are fully deleted before the parent's own record delete, and
//!   the parent record is deleted before the grandparent's child-list pull.
//! - Every step is individually idempotent, so an interrupted cascade can
//!   be re-invoked and converges.
//! - No cross-record transaction is provided; atomicity is per record.

use crate::model::entity::{EntityId, EntityKind};
use crate::service::graph_service::{GraphError, OwnershipGraph};
use crate::store::{self, DocumentStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CascadeResult<T> = Result<T, CascadeError>;

/// Errors from subtree deletion.
#[derive(Debug)]
pub enum CascadeError {
    /// The requested root record does not resolve.
    NotFound { kind: EntityKind, id: EntityId },
    /// A parent required for a child-list pull does not resolve.
    ParentNotFound { kind: EntityKind, id: EntityId },
    /// Persistence-layer failure; the cascade stops where it stood.
    Store(StoreError),
}

impl Display for CascadeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ParentNotFound { kind, id } => write!(f, "owning {kind} not found: {id}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CascadeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for CascadeError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<GraphError> for CascadeError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::ParentNotFound { kind, id } => Self::ParentNotFound { kind, id },
            // Cascades only detach; a set-side invariant violation here is
            // corrupted state, not a missing parent.
            GraphError::PetAlreadySet { user, existing } => Self::Store(StoreError::InvalidData(
                format!("user {user} unexpectedly owns pet {existing} during cascade"),
            )),
            GraphError::Store(err) => Self::Store(err),
        }
    }
}

/// Coordinator for top-down subtree deletion.
pub struct CascadeCoordinator<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> CascadeCoordinator<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Deletes one node and its entire subtree, then pulls the node's id
    /// from its parent's child list.
    ///
    /// Returns the number of records removed. A root id that does not
    /// resolve is `NotFound`; descendant ids that fail to resolve
    /// mid-cascade (leftovers of an interrupted earlier run) are skipped.
    pub fn delete_subtree(&self, kind: EntityKind, id: EntityId) -> CascadeResult<usize> {
        let deleted = self.dispatch_delete(kind, id)?;
        info!(
            "event=cascade_delete module=service status=ok kind={kind} id={id} deleted={deleted}"
        );
        Ok(deleted)
    }

    fn dispatch_delete(&self, kind: EntityKind, id: EntityId) -> CascadeResult<usize> {
        match kind {
            EntityKind::Task => self.delete_task(id),
            EntityKind::Note => self.delete_note(id),
            EntityKind::Folder => self.delete_folder(id),
            EntityKind::Pet => self.delete_pet(id),
            EntityKind::User => self.delete_user(id),
        }
    }

    fn delete_task(&self, id: EntityId) -> CascadeResult<usize> {
        let task = store::get_task(&self.store, id)?.ok_or(CascadeError::NotFound {
            kind: EntityKind::Task,
            id,
        })?;

        self.store.delete(EntityKind::Task, id)?;
        self.graph().detach_task(task.note, id)?;
        Ok(1)
    }

    fn delete_note(&self, id: EntityId) -> CascadeResult<usize> {
        let note = store::get_note(&self.store, id)?.ok_or(CascadeError::NotFound {
            kind: EntityKind::Note,
            id,
        })?;

        let mut deleted = 0;
        for task_id in &note.tasks {
            deleted += self.delete_descendant(EntityKind::Task, *task_id)?;
        }

        self.store.delete(EntityKind::Note, id)?;
        self.graph().detach_note(note.folder, id)?;
        Ok(deleted + 1)
    }

    fn delete_folder(&self, id: EntityId) -> CascadeResult<usize> {
        let folder = store::get_folder(&self.store, id)?.ok_or(CascadeError::NotFound {
            kind: EntityKind::Folder,
            id,
        })?;

        let mut deleted = 0;
        for note_id in &folder.notes {
            deleted += self.delete_descendant(EntityKind::Note, *note_id)?;
        }

        self.store.delete(EntityKind::Folder, id)?;
        self.graph().detach_folder(folder.owner, id)?;
        Ok(deleted + 1)
    }

    fn delete_pet(&self, id: EntityId) -> CascadeResult<usize> {
        let pet = store::get_pet(&self.store, id)?.ok_or(CascadeError::NotFound {
            kind: EntityKind::Pet,
            id,
        })?;

        self.store.delete(EntityKind::Pet, id)?;
        self.graph().clear_pet(pet.owner, id)?;
        Ok(1)
    }

    /// Account removal: folders cascade first, then the pet, then the user
    /// record itself. The user is the graph root, so there is no parent
    /// list to pull.
    fn delete_user(&self, id: EntityId) -> CascadeResult<usize> {
        let user = store::get_user(&self.store, id)?.ok_or(CascadeError::NotFound {
            kind: EntityKind::User,
            id,
        })?;

        let mut deleted = 0;
        for folder_id in &user.folders {
            deleted += self.delete_descendant(EntityKind::Folder, *folder_id)?;
        }
        if let Some(pet_id) = user.pet {
            deleted += self.delete_descendant(EntityKind::Pet, pet_id)?;
        }

        self.store.delete(EntityKind::User, id)?;
        Ok(deleted + 1)
    }

    /// Recursive step that tolerates dangling child ids.
    fn delete_descendant(&self, kind: EntityKind, id: EntityId) -> CascadeResult<usize> {
        match self.dispatch_delete(kind, id) {
            Ok(deleted) => Ok(deleted),
            Err(CascadeError::NotFound { .. }) => Ok(0),
            Err(err) => Err(err),
        }
    }

    fn graph(&self) -> OwnershipGraph<&S> {
        OwnershipGraph::new(&self.store)
    }
}
