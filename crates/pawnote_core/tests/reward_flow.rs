use pawnote_core::store::get_task;
use pawnote_core::{
    CategoryPointsConfig, EntityId, MemoryStore, NewTaskRequest, PetService, PetServiceError,
    PetUpdate, RewardDispatcher, RewardError, TaskCategory, TaskStatus, TaskUpdate,
    WorkspaceError, WorkspaceService,
};

fn default_services(
    store: &MemoryStore,
) -> (WorkspaceService<&MemoryStore>, PetService<&MemoryStore>) {
    let workspace = WorkspaceService::new(store, CategoryPointsConfig::default());
    let pets = PetService::new(store, RewardDispatcher::new(CategoryPointsConfig::default()));
    (workspace, pets)
}

fn seeded_task(
    workspace: &WorkspaceService<&MemoryStore>,
    user_id: EntityId,
    category: TaskCategory,
) -> EntityId {
    let folder = workspace.create_folder(user_id, "Inbox").unwrap();
    let note = workspace.create_note(folder.uuid, "Today", "").unwrap();
    workspace
        .create_task(
            note.uuid,
            NewTaskRequest {
                title: "Water the plants".to_string(),
                category,
                due_date: None,
            },
        )
        .unwrap()
        .uuid
}

#[test]
fn completing_a_task_awards_the_adopted_pet() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    pets.adopt_pet(user.uuid, "Mochi").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);

    let completion = pets.complete_task(task_id).unwrap();
    assert_eq!(completion.task.status, TaskStatus::Completed);
    assert!(completion.task.completed_at.is_some());

    // 250 easy points over a fresh pet: one level-up, 150 left inside level 2.
    let pet = completion.pet.expect("pet should be awarded");
    assert_eq!(pet.level, 2);
    assert_eq!(pet.points, 150);

    let persisted = pets.get_pet(user.uuid).unwrap().unwrap();
    assert_eq!(persisted, pet);
}

#[test]
fn completion_without_a_pet_skips_the_reward() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Medium);

    let completion = pets.complete_task(task_id).unwrap();
    assert_eq!(completion.task.status, TaskStatus::Completed);
    assert!(completion.pet.is_none());
}

#[test]
fn repeated_completion_never_awards_twice() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    pets.adopt_pet(user.uuid, "Mochi").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);

    let first = pets.complete_task(task_id).unwrap();
    let err = pets.complete_task(task_id).unwrap_err();
    assert!(matches!(err, PetServiceError::AlreadyCompleted(id) if id == task_id));

    let pet = pets.get_pet(user.uuid).unwrap().unwrap();
    assert_eq!(Some(pet), first.pet);
}

#[test]
fn unmapped_category_fails_dispatch() {
    let store = MemoryStore::new();
    // Tasks are created with the full table, but the dispatcher runs with a
    // tuned-down table missing `hard`.
    let workspace = WorkspaceService::new(&store, CategoryPointsConfig::default());
    let partial = CategoryPointsConfig::from_entries([(TaskCategory::Easy, 250)]);
    let pets = PetService::new(&store, RewardDispatcher::new(partial));

    let user = workspace.register_user("ada").unwrap();
    pets.adopt_pet(user.uuid, "Mochi").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Hard);

    let err = pets.complete_task(task_id).unwrap_err();
    assert!(matches!(
        err,
        PetServiceError::Reward(RewardError::UnknownCategory(TaskCategory::Hard))
    ));

    // The pet was never touched.
    let pet = pets.get_pet(user.uuid).unwrap().unwrap();
    assert_eq!(pet.level, 1);
    assert_eq!(pet.points, 0);
}

#[test]
fn adopting_a_second_pet_is_rejected() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let first = pets.adopt_pet(user.uuid, "Mochi").unwrap();

    let err = pets.adopt_pet(user.uuid, "Biscuit").unwrap_err();
    assert!(matches!(
        err,
        PetServiceError::PetAlreadyAdopted { pet, .. } if pet == first.uuid
    ));
}

#[test]
fn category_change_rederives_points_and_ignores_explicit_override() {
    let store = MemoryStore::new();
    let (workspace, _pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);
    assert_eq!(get_task(&store, task_id).unwrap().unwrap().points, 250);

    let updated = workspace
        .update_task(
            task_id,
            TaskUpdate {
                category: Some(TaskCategory::Hard),
                points: Some(42),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.category, TaskCategory::Hard);
    assert_eq!(updated.points, 1000);
}

#[test]
fn explicit_points_override_without_category_change_is_honored() {
    let store = MemoryStore::new();
    let (workspace, _pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Medium);

    let updated = workspace
        .update_task(
            task_id,
            TaskUpdate {
                points: Some(625),
                ..TaskUpdate::default()
            },
        )
        .unwrap();
    assert_eq!(updated.category, TaskCategory::Medium);
    assert_eq!(updated.points, 625);

    let err = workspace
        .update_task(
            task_id,
            TaskUpdate {
                points: Some(-5),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::InvalidPoints(-5)));
}

#[test]
fn completion_cannot_happen_through_a_field_update() {
    let store = MemoryStore::new();
    let (workspace, _pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);

    let err = workspace
        .update_task(
            task_id,
            TaskUpdate {
                status: Some(TaskStatus::Completed),
                ..TaskUpdate::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, WorkspaceError::CompletionViaUpdate(id) if id == task_id));
}

#[test]
fn reopening_keeps_awarded_experience() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    pets.adopt_pet(user.uuid, "Mochi").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);

    pets.complete_task(task_id).unwrap();
    let reopened = pets.reopen_task(task_id).unwrap();
    assert_eq!(reopened.status, TaskStatus::Pending);
    assert!(reopened.completed_at.is_none());

    // Forward-only rewards: no deduction on reopen.
    let pet = pets.get_pet(user.uuid).unwrap().unwrap();
    assert_eq!(pet.level, 2);
    assert_eq!(pet.points, 150);

    let err = pets.reopen_task(task_id).unwrap_err();
    assert!(matches!(err, PetServiceError::NotCompleted(id) if id == task_id));
}

#[test]
fn completing_an_overdue_task_still_awards() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    pets.adopt_pet(user.uuid, "Mochi").unwrap();
    let task_id = seeded_task(&workspace, user.uuid, TaskCategory::Easy);

    workspace
        .update_task(
            task_id,
            TaskUpdate {
                status: Some(TaskStatus::Overdue),
                ..TaskUpdate::default()
            },
        )
        .unwrap();

    let completion = pets.complete_task(task_id).unwrap();
    assert_eq!(completion.pet.unwrap().level, 2);
}

#[test]
fn overdue_sweep_flips_only_past_due_pending_tasks() {
    let store = MemoryStore::new();
    let (workspace, _pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let folder = workspace.create_folder(user.uuid, "Inbox").unwrap();
    let note = workspace.create_note(folder.uuid, "Today", "").unwrap();

    let due_yesterday = workspace
        .create_task(
            note.uuid,
            NewTaskRequest {
                title: "late".to_string(),
                category: TaskCategory::Easy,
                due_date: Some(1_000),
            },
        )
        .unwrap();
    let due_tomorrow = workspace
        .create_task(
            note.uuid,
            NewTaskRequest {
                title: "on time".to_string(),
                category: TaskCategory::Easy,
                due_date: Some(100_000),
            },
        )
        .unwrap();

    let changed = workspace.sweep_overdue(note.uuid, 50_000).unwrap();
    assert_eq!(changed, 1);
    assert_eq!(
        get_task(&store, due_yesterday.uuid).unwrap().unwrap().status,
        TaskStatus::Overdue
    );
    assert_eq!(
        get_task(&store, due_tomorrow.uuid).unwrap().unwrap().status,
        TaskStatus::Pending
    );

    // A second sweep changes nothing.
    assert_eq!(workspace.sweep_overdue(note.uuid, 50_000).unwrap(), 0);
}

#[test]
fn pet_rename_goes_through_the_allow_list() {
    let store = MemoryStore::new();
    let (workspace, pets) = default_services(&store);
    let user = workspace.register_user("ada").unwrap();
    let pet = pets.adopt_pet(user.uuid, "Mochi").unwrap();

    let renamed = pets
        .update_pet(
            pet.uuid,
            PetUpdate {
                name: Some("Biscuit".to_string()),
            },
        )
        .unwrap();
    assert_eq!(renamed.name, "Biscuit");

    let err = pets
        .update_pet(
            pet.uuid,
            PetUpdate {
                name: Some("   ".to_string()),
            },
        )
        .unwrap_err();
    assert!(matches!(err, PetServiceError::InvalidName));
}
