//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `pawnote_core` linkage.
//! - Walk one full account lifecycle against the in-memory store and
//!   print deterministic state checkpoints.

use pawnote_core::{
    CategoryPointsConfig, CascadeCoordinator, EntityKind, MemoryStore, NewTaskRequest, PetService,
    RewardDispatcher, TaskCategory, WorkspaceService,
};

fn main() {
    println!("pawnote_core version={}", pawnote_core::core_version());

    let store = MemoryStore::new();
    if let Err(err) = smoke(&store) {
        eprintln!("smoke run failed: {err}");
        std::process::exit(1);
    }
}

fn smoke(store: &MemoryStore) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = WorkspaceService::new(store, CategoryPointsConfig::default());
    let pets = PetService::new(store, RewardDispatcher::new(CategoryPointsConfig::default()));
    let cascade = CascadeCoordinator::new(store);

    let user = workspace.register_user("smoke")?;
    pets.adopt_pet(user.uuid, "Mochi")?;
    let folder = workspace.create_folder(user.uuid, "Inbox")?;
    let note = workspace.create_note(folder.uuid, "Today", "- groceries")?;
    let task = workspace.create_task(
        note.uuid,
        NewTaskRequest {
            title: "Buy groceries".to_string(),
            category: TaskCategory::Easy,
            due_date: None,
        },
    )?;

    let completion = pets.complete_task(task.uuid)?;
    if let Some(pet) = completion.pet {
        println!("pet level={} points={}", pet.level, pet.points);
    }

    let deleted = cascade.delete_subtree(EntityKind::Folder, folder.uuid)?;
    println!("cascade deleted={deleted}");
    println!("documents remaining={}", store.len());
    Ok(())
}
