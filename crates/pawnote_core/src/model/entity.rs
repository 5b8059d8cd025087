//! Ownership graph records: User, Folder, Note, Task, Pet.
//!
//! # Responsibility
//! - Define the canonical record shapes persisted through the document port.
//! - Provide the pure child-list operations (idempotent attach/detach).
//!
//! # Invariants
//! - A child id is appended to a parent list at most once.
//! - Detaching an absent id is a no-op, never an error.
//! - `Task.points` mirrors the mapped value for `Task.category` unless an
//!   update explicitly overrides it without changing the category.

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for every record in the ownership graph.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type EntityId = Uuid;

/// Discriminator for the five persisted record kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Folder,
    Note,
    Task,
    Pet,
}

impl EntityKind {
    /// Stable lowercase name used in storage keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Folder => "folder",
            Self::Note => "note",
            Self::Task => "task",
            Self::Pet => "pet",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created and actionable.
    Pending,
    /// Finished; completion awarded pet experience exactly once.
    Completed,
    /// Past its due date without completion.
    Overdue,
}

/// Difficulty bucket deciding how many points a task is worth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Easy,
    Medium,
    Hard,
}

impl TaskCategory {
    /// Stable lowercase name used in config keys and log lines.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Parses an external category key. Unknown keys return `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Account root of the ownership graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub uuid: EntityId,
    /// Display identity; credential handling lives outside this core.
    pub username: String,
    /// Owned folder ids, insertion order preserved.
    pub folders: Vec<EntityId>,
    /// The single companion pet. `None` until first adoption.
    pub pet: Option<EntityId>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            username: username.into(),
            folders: Vec::new(),
            pet: None,
        }
    }

    /// Appends a folder id unless it is already referenced.
    pub fn attach_folder(&mut self, folder_id: EntityId) {
        if !self.folders.contains(&folder_id) {
            self.folders.push(folder_id);
        }
    }

    /// Removes a folder id if present.
    pub fn detach_folder(&mut self, folder_id: EntityId) {
        self.folders.retain(|id| *id != folder_id);
    }
}

/// Grouping node owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub uuid: EntityId,
    /// Owning user id.
    pub owner: EntityId,
    pub title: String,
    /// Owned note ids.
    pub notes: Vec<EntityId>,
}

impl Folder {
    pub fn new(owner: EntityId, title: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
            title: title.into(),
            notes: Vec::new(),
        }
    }

    pub fn attach_note(&mut self, note_id: EntityId) {
        if !self.notes.contains(&note_id) {
            self.notes.push(note_id);
        }
    }

    pub fn detach_note(&mut self, note_id: EntityId) {
        self.notes.retain(|id| *id != note_id);
    }
}

/// Text node owned by exactly one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub uuid: EntityId,
    /// Owning folder id.
    pub folder: EntityId,
    pub title: String,
    pub content: String,
    /// Owned task ids.
    pub tasks: Vec<EntityId>,
}

impl Note {
    pub fn new(folder: EntityId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            folder,
            title: title.into(),
            content: content.into(),
            tasks: Vec::new(),
        }
    }

    pub fn attach_task(&mut self, task_id: EntityId) {
        if !self.tasks.contains(&task_id) {
            self.tasks.push(task_id);
        }
    }

    pub fn detach_task(&mut self, task_id: EntityId) {
        self.tasks.retain(|id| *id != task_id);
    }
}

/// Actionable item owned by one note, with a denormalized owner reference
/// so the reward path can reach the user's pet without walking the chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub uuid: EntityId,
    /// Owning note id.
    pub note: EntityId,
    /// Denormalized owning user id.
    pub owner: EntityId,
    pub title: String,
    pub status: TaskStatus,
    pub category: TaskCategory,
    /// Mapped value for `category`, re-derived on every category change.
    pub points: i64,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Optional due date in epoch milliseconds.
    pub due_date: Option<i64>,
    /// Set exactly once, when the task transitions to completed.
    pub completed_at: Option<i64>,
}

impl Task {
    pub fn new(
        note: EntityId,
        owner: EntityId,
        title: impl Into<String>,
        category: TaskCategory,
        points: i64,
        created_at: i64,
    ) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            note,
            owner,
            title: title.into(),
            status: TaskStatus::Pending,
            category,
            points,
            created_at,
            due_date: None,
            completed_at: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Flips a pending task past its due date to overdue.
    ///
    /// Returns `true` when the status actually changed.
    pub fn refresh_overdue(&mut self, now_ms: i64) -> bool {
        let past_due = matches!(self.due_date, Some(due) if due < now_ms);
        if self.status == TaskStatus::Pending && past_due {
            self.status = TaskStatus::Overdue;
            return true;
        }
        false
    }
}

/// The single companion pet owned by one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub uuid: EntityId,
    /// Owning user id.
    pub owner: EntityId,
    pub name: String,
    /// Always >= 1.
    pub level: u32,
    /// Experience within the current level, in `[0, required_experience(level))`.
    pub points: i64,
}

impl Pet {
    pub fn new(owner: EntityId, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            owner,
            name: name.into(),
            level: 1,
            points: 0,
        }
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}
