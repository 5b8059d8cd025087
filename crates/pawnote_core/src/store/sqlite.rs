//! SQLite-backed document store.
//!
//! # Responsibility
//! - Persist documents as JSON bodies in the `documents` table.
//! - Keep SQL details inside the store boundary.
//!
//! # Invariants
//! - The connection must be migrated before a store is constructed.
//! - Save is a single-row upsert; atomicity comes from SQLite itself.
//! - A stored body whose kind or id disagrees with its row key is rejected
//!   as invalid data instead of being masked.

use super::{Document, DocumentStore, StoreError, StoreResult};
use crate::db::migrations::latest_version;
use crate::model::entity::{EntityId, EntityKind};
use rusqlite::{params, Connection, OptionalExtension};

/// Document store over a migrated SQLite connection.
#[derive(Debug)]
pub struct SqliteStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Creates a store from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_store_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DocumentStore for SqliteStore<'_> {
    fn get(&self, kind: EntityKind, id: EntityId) -> StoreResult<Option<Document>> {
        let body: Option<String> = self
            .conn
            .query_row(
                "SELECT body
                 FROM documents
                 WHERE kind = ?1
                   AND uuid = ?2;",
                params![kind.as_str(), id.to_string()],
                |row| row.get(0),
            )
            .optional()?;

        let Some(body) = body else {
            return Ok(None);
        };

        let document: Document = serde_json::from_str(&body)?;
        if document.kind() != kind || document.id() != id {
            return Err(StoreError::InvalidData(format!(
                "row keyed ({kind}, {id}) holds body for ({}, {})",
                document.kind(),
                document.id()
            )));
        }
        Ok(Some(document))
    }

    fn put(&self, document: &Document) -> StoreResult<()> {
        let body = serde_json::to_string(document)?;
        self.conn.execute(
            "INSERT INTO documents (kind, uuid, body)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (kind, uuid) DO UPDATE SET
                body = excluded.body,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![
                document.kind().as_str(),
                document.id().to_string(),
                body.as_str(),
            ],
        )?;
        Ok(())
    }

    fn delete(&self, kind: EntityKind, id: EntityId) -> StoreResult<()> {
        // Zero affected rows is fine: delete is idempotent by contract.
        self.conn.execute(
            "DELETE FROM documents
             WHERE kind = ?1
               AND uuid = ?2;",
            params![kind.as_str(), id.to_string()],
        )?;
        Ok(())
    }
}

fn ensure_store_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::InvalidData(format!(
            "document store requires schema version {expected_version}, got {actual_version}"
        )));
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'documents'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists != 1 {
        return Err(StoreError::InvalidData(
            "document store requires table `documents`".to_string(),
        ));
    }

    for column in ["kind", "uuid", "body", "updated_at"] {
        if !table_has_column(conn, "documents", column)? {
            return Err(StoreError::InvalidData(format!(
                "document store requires column `{column}` in table `documents`"
            )));
        }
    }

    Ok(())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
