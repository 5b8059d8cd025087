use pawnote_core::db::migrations::latest_version;
use pawnote_core::db::{open_db, open_db_in_memory};
use pawnote_core::{
    Document, DocumentStore, EntityKind, Folder, MemoryStore, Note, Pet, SqliteStore, StoreError,
    Task, TaskCategory, User,
};
use uuid::Uuid;

#[test]
fn migration_creates_documents_table() {
    let conn = open_db_in_memory().unwrap();

    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'documents'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn migrations_are_idempotent_on_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pawnote.db");

    {
        let conn = open_db(&path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        store
            .put(&Document::User(User::new("ada")))
            .unwrap();
    }

    // Second open must see the migrated schema and the stored row.
    let conn = open_db(&path).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn store_rejects_unmigrated_connections() {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    let err = SqliteStore::try_new(&conn).unwrap_err();
    assert!(matches!(err, StoreError::InvalidData(_)));
}

#[test]
fn sqlite_round_trips_every_document_kind() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let user = User::new("ada");
    let folder = Folder::new(user.uuid, "Inbox");
    let note = Note::new(folder.uuid, "Today", "- groceries");
    let mut task = Task::new(note.uuid, user.uuid, "Buy", TaskCategory::Easy, 250, 1_000);
    task.due_date = Some(2_000);
    let pet = Pet::new(user.uuid, "Mochi");

    let documents = [
        Document::User(user),
        Document::Folder(folder),
        Document::Note(note),
        Document::Task(task),
        Document::Pet(pet),
    ];

    for document in &documents {
        store.put(document).unwrap();
        let loaded = store.get(document.kind(), document.id()).unwrap().unwrap();
        assert_eq!(&loaded, document);
    }
}

#[test]
fn put_replaces_the_previous_version() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let mut user = User::new("ada");
    store.put(&Document::User(user.clone())).unwrap();

    user.attach_folder(Uuid::new_v4());
    store.put(&Document::User(user.clone())).unwrap();

    let loaded = store.get(EntityKind::User, user.uuid).unwrap().unwrap();
    assert_eq!(loaded, Document::User(user));

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM documents;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn delete_is_idempotent_in_both_stores() {
    let conn = open_db_in_memory().unwrap();
    let sqlite_store = SqliteStore::try_new(&conn).unwrap();
    let memory_store = MemoryStore::new();

    let user = User::new("ada");
    for store in [&sqlite_store as &dyn DocumentStore, &memory_store] {
        store.put(&Document::User(user.clone())).unwrap();
        store.delete(EntityKind::User, user.uuid).unwrap();
        store.delete(EntityKind::User, user.uuid).unwrap();
        assert!(store.get(EntityKind::User, user.uuid).unwrap().is_none());
        // Deleting an id that never existed is also fine.
        store.delete(EntityKind::Pet, Uuid::new_v4()).unwrap();
    }
}

#[test]
fn get_misses_return_none_not_errors() {
    let conn = open_db_in_memory().unwrap();
    let sqlite_store = SqliteStore::try_new(&conn).unwrap();
    let memory_store = MemoryStore::new();

    for store in [&sqlite_store as &dyn DocumentStore, &memory_store] {
        assert!(store.get(EntityKind::Task, Uuid::new_v4()).unwrap().is_none());
    }
}

#[test]
fn kinds_do_not_collide_on_the_same_id() {
    let memory_store = MemoryStore::new();
    let user = User::new("ada");
    memory_store.put(&Document::User(user.clone())).unwrap();

    // A different kind under the same id is a separate record.
    assert!(memory_store
        .get(EntityKind::Folder, user.uuid)
        .unwrap()
        .is_none());

    memory_store.delete(EntityKind::Folder, user.uuid).unwrap();
    assert!(memory_store
        .get(EntityKind::User, user.uuid)
        .unwrap()
        .is_some());
}

#[test]
fn document_body_is_kind_tagged_json() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let pet = Pet::new(Uuid::new_v4(), "Mochi");
    store.put(&Document::Pet(pet.clone())).unwrap();

    let body: String = conn
        .query_row(
            "SELECT body FROM documents WHERE kind = 'pet' AND uuid = ?1;",
            [pet.uuid.to_string()],
            |row| row.get(0),
        )
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(value["kind"], "pet");
    assert_eq!(value["level"], 1);
    assert_eq!(value["name"], "Mochi");
}
