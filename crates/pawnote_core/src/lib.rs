//! Core domain logic for Pawnote.
//! This crate is the single source of truth for business invariants.

pub mod config;
pub mod db;
pub mod leveling;
pub mod logging;
pub mod model;
pub mod reward;
pub mod service;
pub mod store;

pub use config::CategoryPointsConfig;
pub use leveling::{apply_points, required_experience, LevelProgress};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::entity::{
    EntityId, EntityKind, Folder, Note, Pet, Task, TaskCategory, TaskStatus, User,
};
pub use reward::{RewardDispatcher, RewardError};
pub use service::cascade_service::{CascadeCoordinator, CascadeError, CascadeResult};
pub use service::graph_service::{GraphError, OwnershipGraph};
pub use service::pet_service::{PetService, PetServiceError, PetUpdate, TaskCompletion};
pub use service::workspace_service::{
    FolderUpdate, NewTaskRequest, NoteUpdate, TaskUpdate, WorkspaceError, WorkspaceService,
};
pub use store::{Document, DocumentStore, MemoryStore, SqliteStore, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
