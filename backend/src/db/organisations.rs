use super::{Store, StoreError};
use formgen_common::model::organisation::Organisation;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, name, created_at, updated_at";

fn from_row(row: &Row) -> rusqlite::Result<Organisation> {
    Ok(Organisation {
        id: row.get(0)?,
        name: row.get(1)?,
        created_at: row.get(2)?,
        updated_at: row.get(3)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<Organisation, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM organisations WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound("Organisation"))
}

impl Store {
    pub fn create_organisation(&self, name: &str) -> Result<Organisation, StoreError> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO organisations (name) VALUES (?1)", params![name])?;
            fetch(conn, conn.last_insert_rowid())
        })
    }

    pub fn organisation(&self, id: i64) -> Result<Organisation, StoreError> {
        self.with_conn(|conn| fetch(conn, id))
    }

    pub fn organisations(&self) -> Result<Vec<Organisation>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM organisations ORDER BY name, id",
                COLUMNS
            ))?;
            let rows = stmt.query_map([], from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Deletes an organisation together with its templates, their generated
    /// cards, and its forms.
    pub fn delete_organisation(&self, id: i64) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            match conn.execute("DELETE FROM organisations WHERE id = ?1", [id])? {
                0 => Err(StoreError::NotFound("Organisation")),
                _ => Ok(()),
            }
        })
    }
}
