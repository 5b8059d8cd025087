//! Pet adoption and the task-completion reward path.
//!
//! # Responsibility
//! - Enforce the one-pet-per-user invariant at adoption time.
//! - Drive task completion: status transition, reward dispatch, pet
//!   persistence.
//!
//! # Invariants
//! - A completed task never awards twice; repeated completion is rejected.
//! - Reopening or deleting a completed task deducts nothing.
//! - A user without a pet completes tasks normally; the reward is skipped.

use crate::model::entity::{now_epoch_ms, EntityId, EntityKind, Pet, Task, TaskStatus, User};
use crate::reward::{RewardDispatcher, RewardError};
use crate::service::graph_service::{GraphError, OwnershipGraph};
use crate::store::{self, Document, DocumentStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from pet use-cases and the completion path.
#[derive(Debug)]
pub enum PetServiceError {
    /// Pet name is blank after trimming.
    InvalidName,
    /// Target record does not resolve.
    NotFound { kind: EntityKind, id: EntityId },
    /// The user already adopted their single companion pet.
    PetAlreadyAdopted { user: EntityId, pet: EntityId },
    /// The task is already completed; it cannot award again.
    AlreadyCompleted(EntityId),
    /// Reopening requires a completed task.
    NotCompleted(EntityId),
    /// Reward dispatch failure (unmapped category).
    Reward(RewardError),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for PetServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidName => write!(f, "pet name must not be blank"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::PetAlreadyAdopted { user, pet } => {
                write!(f, "user {user} already adopted pet {pet}")
            }
            Self::AlreadyCompleted(id) => write!(f, "task {id} is already completed"),
            Self::NotCompleted(id) => write!(f, "task {id} is not completed"),
            Self::Reward(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PetServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Reward(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for PetServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<RewardError> for PetServiceError {
    fn from(value: RewardError) -> Self {
        Self::Reward(value)
    }
}

impl From<GraphError> for PetServiceError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::ParentNotFound { kind, id } => Self::NotFound { kind, id },
            GraphError::PetAlreadySet { user, existing } => Self::PetAlreadyAdopted {
                user,
                pet: existing,
            },
            GraphError::Store(err) => Self::Store(err),
        }
    }
}

/// Allow-listed pet fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetUpdate {
    pub name: Option<String>,
}

/// Outcome of one completion: the saved task, and the pet when one was
/// adopted and therefore awarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskCompletion {
    pub task: Task,
    pub pet: Option<Pet>,
}

/// Pet service facade over one document store.
pub struct PetService<S: DocumentStore> {
    store: S,
    dispatcher: RewardDispatcher,
}

impl<S: DocumentStore> PetService<S> {
    pub fn new(store: S, dispatcher: RewardDispatcher) -> Self {
        Self { store, dispatcher }
    }

    /// Creates the user's single companion pet.
    pub fn adopt_pet(
        &self,
        user_id: EntityId,
        name: impl Into<String>,
    ) -> Result<Pet, PetServiceError> {
        let name = normalize_name(name.into())?;
        let user = self.require_user(user_id)?;
        if let Some(existing) = user.pet {
            return Err(PetServiceError::PetAlreadyAdopted {
                user: user_id,
                pet: existing,
            });
        }

        let pet = Pet::new(user_id, name);
        self.store.put(&Document::Pet(pet.clone()))?;
        OwnershipGraph::new(&self.store).set_pet(user_id, pet.uuid)?;
        info!(
            "event=pet_adopt module=service status=ok user={user_id} pet={}",
            pet.uuid
        );
        Ok(pet)
    }

    /// Loads the user's pet, `None` before first adoption.
    pub fn get_pet(&self, user_id: EntityId) -> Result<Option<Pet>, PetServiceError> {
        let user = self.require_user(user_id)?;
        match user.pet {
            None => Ok(None),
            Some(pet_id) => Ok(store::get_pet(&self.store, pet_id)?),
        }
    }

    /// Applies allow-listed pet fields.
    pub fn update_pet(&self, pet_id: EntityId, update: PetUpdate) -> Result<Pet, PetServiceError> {
        let mut pet =
            store::get_pet(&self.store, pet_id)?.ok_or(PetServiceError::NotFound {
                kind: EntityKind::Pet,
                id: pet_id,
            })?;
        if let Some(name) = update.name {
            pet.name = normalize_name(name)?;
        }
        self.store.put(&Document::Pet(pet.clone()))?;
        Ok(pet)
    }

    /// Completes one pending or overdue task and routes the category's
    /// point delta to the owner's pet.
    ///
    /// The task is saved before the pet: a crash between the two writes
    /// leaves a completed-but-unawarded task, never a double award.
    pub fn complete_task(&self, task_id: EntityId) -> Result<TaskCompletion, PetServiceError> {
        let mut task =
            store::get_task(&self.store, task_id)?.ok_or(PetServiceError::NotFound {
                kind: EntityKind::Task,
                id: task_id,
            })?;
        if task.is_completed() {
            return Err(PetServiceError::AlreadyCompleted(task_id));
        }

        let user = self.require_user(task.owner)?;

        task.status = TaskStatus::Completed;
        task.completed_at = Some(now_epoch_ms());
        self.store.put(&Document::Task(task.clone()))?;

        let pet = match user.pet {
            None => None,
            Some(pet_id) => match store::get_pet(&self.store, pet_id)? {
                None => None,
                Some(pet) => {
                    let awarded = self.dispatcher.dispatch(&pet, task.category)?;
                    self.store.put(&Document::Pet(awarded.clone()))?;
                    info!(
                        "event=task_reward module=service status=ok task={task_id} pet={} category={} level={} points={}",
                        awarded.uuid, task.category, awarded.level, awarded.points
                    );
                    Some(awarded)
                }
            },
        };

        Ok(TaskCompletion { task, pet })
    }

    /// Moves a completed task back to pending.
    ///
    /// Awarded experience stays with the pet; reopening deducts nothing.
    pub fn reopen_task(&self, task_id: EntityId) -> Result<Task, PetServiceError> {
        let mut task =
            store::get_task(&self.store, task_id)?.ok_or(PetServiceError::NotFound {
                kind: EntityKind::Task,
                id: task_id,
            })?;
        if !task.is_completed() {
            return Err(PetServiceError::NotCompleted(task_id));
        }

        task.status = TaskStatus::Pending;
        task.completed_at = None;
        self.store.put(&Document::Task(task.clone()))?;
        Ok(task)
    }

    fn require_user(&self, id: EntityId) -> Result<User, PetServiceError> {
        store::get_user(&self.store, id)?.ok_or(PetServiceError::NotFound {
            kind: EntityKind::User,
            id,
        })
    }
}

fn normalize_name(value: String) -> Result<String, PetServiceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(PetServiceError::InvalidName);
    }
    Ok(trimmed.to_string())
}
