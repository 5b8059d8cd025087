//! Folder/note/task use-case service.
//!
//! # Responsibility
//! - Provide the create/update/list surface the surrounding CRUD layer
//!   calls into.
//! - Derive task points from the injected category table.
//!
//! # Invariants
//! - A child record is saved before its id is referenced into the parent's
//!   child list, so lists never point at records that were never written.
//! - Updates go through explicit allow-list structs; unknown fields cannot
//!   reach a record.
//! - A category change always re-derives points; an explicit points value
//!   is honored only when the category is unchanged.

use crate::config::CategoryPointsConfig;
use crate::model::entity::{
    now_epoch_ms, EntityId, EntityKind, Folder, Note, Task, TaskCategory, TaskStatus, User,
};
use crate::service::graph_service::{GraphError, OwnershipGraph};
use crate::store::{self, Document, DocumentStore, StoreError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from workspace use-cases.
#[derive(Debug)]
pub enum WorkspaceError {
    /// Title or username is blank after trimming.
    InvalidTitle,
    /// Explicit points override is negative.
    InvalidPoints(i64),
    /// Target record does not resolve.
    NotFound { kind: EntityKind, id: EntityId },
    /// Parent record for a create/list does not resolve.
    ParentNotFound { kind: EntityKind, id: EntityId },
    /// The injected category table has no entry for this category.
    UnknownCategory(TaskCategory),
    /// Completion must go through the reward path, not a field update.
    CompletionViaUpdate(EntityId),
    /// Status of a completed task can only change by reopening it.
    TaskAlreadyCompleted(EntityId),
    /// Persistence-layer failure.
    Store(StoreError),
}

impl Display for WorkspaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "title must not be blank"),
            Self::InvalidPoints(points) => write!(f, "points must not be negative: {points}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::ParentNotFound { kind, id } => write!(f, "owning {kind} not found: {id}"),
            Self::UnknownCategory(category) => {
                write!(f, "no point mapping for category `{category}`")
            }
            Self::CompletionViaUpdate(id) => {
                write!(f, "task {id} can only be completed through the reward path")
            }
            Self::TaskAlreadyCompleted(id) => {
                write!(f, "task {id} is completed; reopen it before changing status")
            }
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for WorkspaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for WorkspaceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<GraphError> for WorkspaceError {
    fn from(value: GraphError) -> Self {
        match value {
            GraphError::ParentNotFound { kind, id } => Self::ParentNotFound { kind, id },
            GraphError::PetAlreadySet { user, existing } => {
                Self::Store(StoreError::InvalidData(format!(
                    "unexpected pet link mutation for user {user} (pet {existing})"
                )))
            }
            GraphError::Store(err) => Self::Store(err),
        }
    }
}

/// Request model for creating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskRequest {
    pub title: String,
    pub category: TaskCategory,
    /// Optional due date in epoch milliseconds.
    pub due_date: Option<i64>,
}

/// Allow-listed folder fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderUpdate {
    pub title: Option<String>,
}

/// Allow-listed note fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Allow-listed task fields.
///
/// `due_date` uses two option layers: the outer layer means "field present
/// in the update", the inner layer sets or clears the date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub category: Option<TaskCategory>,
    pub points: Option<i64>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Option<i64>>,
}

/// Workspace service facade over one document store.
pub struct WorkspaceService<S: DocumentStore> {
    store: S,
    points: CategoryPointsConfig,
}

impl<S: DocumentStore> WorkspaceService<S> {
    pub fn new(store: S, points: CategoryPointsConfig) -> Self {
        Self { store, points }
    }

    /// Creates one account root with an empty folder list and no pet.
    pub fn register_user(&self, username: impl Into<String>) -> Result<User, WorkspaceError> {
        let username = normalize_title(username.into())?;
        let user = User::new(username);
        self.store.put(&Document::User(user.clone()))?;
        info!(
            "event=user_register module=service status=ok id={}",
            user.uuid
        );
        Ok(user)
    }

    /// Creates one folder under a user.
    pub fn create_folder(
        &self,
        user_id: EntityId,
        title: impl Into<String>,
    ) -> Result<Folder, WorkspaceError> {
        let title = normalize_title(title.into())?;
        self.require_user(user_id)?;

        let folder = Folder::new(user_id, title);
        self.store.put(&Document::Folder(folder.clone()))?;
        self.graph().attach_folder(user_id, folder.uuid)?;
        Ok(folder)
    }

    /// Creates one note under a folder.
    pub fn create_note(
        &self,
        folder_id: EntityId,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note, WorkspaceError> {
        let title = normalize_title(title.into())?;
        self.require_folder(folder_id)?;

        let note = Note::new(folder_id, title, content);
        self.store.put(&Document::Note(note.clone()))?;
        self.graph().attach_note(folder_id, note.uuid)?;
        Ok(note)
    }

    /// Creates one task under a note, deriving its points from the
    /// injected category table and denormalizing the owning user id.
    pub fn create_task(
        &self,
        note_id: EntityId,
        request: NewTaskRequest,
    ) -> Result<Task, WorkspaceError> {
        let title = normalize_title(request.title)?;
        let note = self.require_note(note_id)?;
        let folder = self.require_folder(note.folder)?;

        let points = self
            .points
            .points_for(request.category)
            .ok_or(WorkspaceError::UnknownCategory(request.category))?;

        let mut task = Task::new(
            note_id,
            folder.owner,
            title,
            request.category,
            points,
            now_epoch_ms(),
        );
        task.due_date = request.due_date;

        self.store.put(&Document::Task(task.clone()))?;
        self.graph().attach_task(note_id, task.uuid)?;
        Ok(task)
    }

    pub fn get_folder(&self, id: EntityId) -> Result<Option<Folder>, WorkspaceError> {
        Ok(store::get_folder(&self.store, id)?)
    }

    pub fn get_note(&self, id: EntityId) -> Result<Option<Note>, WorkspaceError> {
        Ok(store::get_note(&self.store, id)?)
    }

    pub fn get_task(&self, id: EntityId) -> Result<Option<Task>, WorkspaceError> {
        Ok(store::get_task(&self.store, id)?)
    }

    /// Resolves a user's folder list to records, skipping dangling ids.
    pub fn list_folders(&self, user_id: EntityId) -> Result<Vec<Folder>, WorkspaceError> {
        let user = self.require_user(user_id)?;
        let mut folders = Vec::with_capacity(user.folders.len());
        for folder_id in &user.folders {
            if let Some(folder) = store::get_folder(&self.store, *folder_id)? {
                folders.push(folder);
            }
        }
        Ok(folders)
    }

    /// Resolves a folder's note list to records, skipping dangling ids.
    pub fn list_notes(&self, folder_id: EntityId) -> Result<Vec<Note>, WorkspaceError> {
        let folder = self.require_folder(folder_id)?;
        let mut notes = Vec::with_capacity(folder.notes.len());
        for note_id in &folder.notes {
            if let Some(note) = store::get_note(&self.store, *note_id)? {
                notes.push(note);
            }
        }
        Ok(notes)
    }

    /// Resolves a note's task list to records, skipping dangling ids.
    pub fn list_tasks(&self, note_id: EntityId) -> Result<Vec<Task>, WorkspaceError> {
        let note = self.require_note(note_id)?;
        let mut tasks = Vec::with_capacity(note.tasks.len());
        for task_id in &note.tasks {
            if let Some(task) = store::get_task(&self.store, *task_id)? {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    /// Applies allow-listed folder fields.
    pub fn update_folder(
        &self,
        id: EntityId,
        update: FolderUpdate,
    ) -> Result<Folder, WorkspaceError> {
        let mut folder = self.require_folder(id).map_err(parent_as_target)?;
        if let Some(title) = update.title {
            folder.title = normalize_title(title)?;
        }
        self.store.put(&Document::Folder(folder.clone()))?;
        Ok(folder)
    }

    /// Applies allow-listed note fields.
    pub fn update_note(&self, id: EntityId, update: NoteUpdate) -> Result<Note, WorkspaceError> {
        let mut note = self.require_note(id).map_err(parent_as_target)?;
        if let Some(title) = update.title {
            note.title = normalize_title(title)?;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        self.store.put(&Document::Note(note.clone()))?;
        Ok(note)
    }

    /// Applies allow-listed task fields.
    ///
    /// A category change re-derives points from the injected table and
    /// ignores any explicit `points` in the same update. Status may move
    /// between `pending` and `overdue` only; completion and reopening are
    /// owned by the pet service.
    pub fn update_task(&self, id: EntityId, update: TaskUpdate) -> Result<Task, WorkspaceError> {
        let mut task = self.require_task(id).map_err(parent_as_target)?;

        if let Some(title) = update.title {
            task.title = normalize_title(title)?;
        }

        match update.category {
            Some(category) if category != task.category => {
                task.category = category;
                task.points = self
                    .points
                    .points_for(category)
                    .ok_or(WorkspaceError::UnknownCategory(category))?;
            }
            _ => {
                if let Some(points) = update.points {
                    if points < 0 {
                        return Err(WorkspaceError::InvalidPoints(points));
                    }
                    task.points = points;
                }
            }
        }

        if let Some(status) = update.status {
            if status == TaskStatus::Completed {
                return Err(WorkspaceError::CompletionViaUpdate(id));
            }
            if task.is_completed() {
                return Err(WorkspaceError::TaskAlreadyCompleted(id));
            }
            task.status = status;
        }

        if let Some(due_date) = update.due_date {
            task.due_date = due_date;
        }

        self.store.put(&Document::Task(task.clone()))?;
        Ok(task)
    }

    /// Flips pending tasks of one note past their due date to overdue.
    ///
    /// Returns the number of tasks that changed.
    pub fn sweep_overdue(&self, note_id: EntityId, now_ms: i64) -> Result<usize, WorkspaceError> {
        let note = self.require_note(note_id)?;
        let mut changed = 0;
        for task_id in &note.tasks {
            let Some(mut task) = store::get_task(&self.store, *task_id)? else {
                continue;
            };
            if task.refresh_overdue(now_ms) {
                self.store.put(&Document::Task(task))?;
                changed += 1;
            }
        }
        if changed > 0 {
            info!(
                "event=overdue_sweep module=service status=ok note={note_id} changed={changed}"
            );
        }
        Ok(changed)
    }

    fn require_user(&self, id: EntityId) -> Result<User, WorkspaceError> {
        store::get_user(&self.store, id)?.ok_or(WorkspaceError::ParentNotFound {
            kind: EntityKind::User,
            id,
        })
    }

    fn require_folder(&self, id: EntityId) -> Result<Folder, WorkspaceError> {
        store::get_folder(&self.store, id)?.ok_or(WorkspaceError::ParentNotFound {
            kind: EntityKind::Folder,
            id,
        })
    }

    fn require_note(&self, id: EntityId) -> Result<Note, WorkspaceError> {
        store::get_note(&self.store, id)?.ok_or(WorkspaceError::ParentNotFound {
            kind: EntityKind::Note,
            id,
        })
    }

    fn require_task(&self, id: EntityId) -> Result<Task, WorkspaceError> {
        store::get_task(&self.store, id)?.ok_or(WorkspaceError::ParentNotFound {
            kind: EntityKind::Task,
            id,
        })
    }

    fn graph(&self) -> OwnershipGraph<&S> {
        OwnershipGraph::new(&self.store)
    }
}

// Updates address the record itself, so a resolution failure is reported
// as the target missing rather than a missing parent.
fn parent_as_target(error: WorkspaceError) -> WorkspaceError {
    match error {
        WorkspaceError::ParentNotFound { kind, id } => WorkspaceError::NotFound { kind, id },
        other => other,
    }
}

fn normalize_title(value: String) -> Result<String, WorkspaceError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}
