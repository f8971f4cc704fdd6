//! # Persistence
//!
//! SQLite storage for organisations, card templates, generated cards and
//! forms. Every JSON document lives in a TEXT column and is read back as a
//! `serde_json::Value` through rusqlite's `serde_json` support.
//!
//! Foreign keys are enforced with `ON DELETE CASCADE`, so removing an
//! organisation removes its templates and forms, and removing a template
//! removes the cards generated from it.
//!
//! Documents are validated with `formgen_common::schema` inside the write
//! operations, before any statement runs; a rejected document leaves the
//! stored row untouched.

mod cards;
mod forms;
mod organisations;
mod templates;

use formgen_common::schema::SchemaViolation;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;
use thiserror::Error;

/// SQL expression producing the current UTC time as an ISO-8601 string.
pub(crate) const NOW: &str = "strftime('%Y-%m-%dT%H:%M:%fZ', 'now')";

const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS organisations (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);

CREATE TABLE IF NOT EXISTS card_templates (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    organisation_id  INTEGER NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
    template_data    TEXT NOT NULL,
    global_vars      TEXT NOT NULL DEFAULT '{}',
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_card_templates_org ON card_templates(organisation_id);

CREATE TABLE IF NOT EXISTS generated_cards (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    template_id  INTEGER NOT NULL REFERENCES card_templates(id) ON DELETE CASCADE,
    name         TEXT NOT NULL,
    card_data    TEXT NOT NULL,
    global_vars  TEXT NOT NULL DEFAULT '{}',
    created_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at   TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_generated_cards_template ON generated_cards(template_id);

CREATE TABLE IF NOT EXISTS forms (
    id               INTEGER PRIMARY KEY AUTOINCREMENT,
    name             TEXT NOT NULL,
    organisation_id  INTEGER NOT NULL REFERENCES organisations(id) ON DELETE CASCADE,
    data             TEXT NOT NULL,
    created_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now')),
    updated_at       TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
);
CREATE INDEX IF NOT EXISTS idx_forms_org ON forms(organisation_id);
";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// An imported document is not JSON at all.
    #[error("Invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A document parsed but does not have the required structure.
    #[error("Invalid schema structure")]
    Schema(#[from] SchemaViolation),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("database connection is poisoned")]
    Poisoned,
}

/// Handle to the application database.
///
/// Built once in `main` and shared through the application state. The single
/// connection is guarded by a mutex; each operation holds it for the duration
/// of its statements only.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Store {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn with_conn<T>(
        &self,
        f: impl FnOnce(&mut Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut conn = self.conn.lock().map_err(|_| StoreError::Poisoned)?;
        f(&mut conn)
    }
}

/// Fails with `NotFound` unless the organisation exists.
pub(crate) fn ensure_organisation(conn: &Connection, organisation_id: i64) -> Result<(), StoreError> {
    conn.query_row(
        "SELECT 1 FROM organisations WHERE id = ?1",
        [organisation_id],
        |_| Ok(()),
    )
    .optional()?
    .ok_or(StoreError::NotFound("Organisation"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_is_idempotent_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("formgen.sqlite");

        let store = Store::open(&path).unwrap();
        let org = store.create_organisation("Acme").unwrap();
        drop(store);

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.organisation(org.id).unwrap(), org);
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let store = Store::open_in_memory().unwrap();
        let enabled: i64 = store
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
