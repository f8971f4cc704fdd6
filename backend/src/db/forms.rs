use super::{ensure_organisation, Store, StoreError, NOW};
use formgen_common::model::form::Form;
use formgen_common::schema::validate_form_schema;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::Value;

const COLUMNS: &str = "id, name, organisation_id, data, created_at, updated_at";

fn from_row(row: &Row) -> rusqlite::Result<Form> {
    Ok(Form {
        id: row.get(0)?,
        name: row.get(1)?,
        organisation_id: row.get(2)?,
        data: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<Form, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM forms WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound("Form"))
}

fn insert(conn: &Connection, organisation_id: i64, name: &str, data: &Value) -> Result<Form, StoreError> {
    conn.execute(
        "INSERT INTO forms (name, organisation_id, data) VALUES (?1, ?2, ?3)",
        params![name, organisation_id, data],
    )?;
    fetch(conn, conn.last_insert_rowid())
}

impl Store {
    pub fn create_form(&self, organisation_id: i64, name: &str, data: &Value) -> Result<Form, StoreError> {
        validate_form_schema(data)?;
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            insert(conn, organisation_id, name, data)
        })
    }

    /// Same contract as [`Store::import_template`], for form schemas.
    pub fn import_form(&self, organisation_id: i64, name: &str, raw_json: &str) -> Result<Form, StoreError> {
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            let data: Value = serde_json::from_str(raw_json)?;
            validate_form_schema(&data)?;
            insert(conn, organisation_id, name, &data)
        })
    }

    pub fn form(&self, id: i64) -> Result<Form, StoreError> {
        self.with_conn(|conn| fetch(conn, id))
    }

    pub fn forms_for(&self, organisation_id: i64) -> Result<Vec<Form>, StoreError> {
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM forms WHERE organisation_id = ?1 ORDER BY id",
                COLUMNS
            ))?;
            let rows = stmt.query_map([organisation_id], from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    pub fn save_form_data(&self, id: i64, data: &Value) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            fetch(conn, id)?;
            validate_form_schema(data)?;
            conn.execute(
                &format!("UPDATE forms SET data = ?1, updated_at = {} WHERE id = ?2", NOW),
                params![data, id],
            )?;
            Ok(())
        })
    }

    /// Returns the id of the organisation that owned the form.
    pub fn delete_form(&self, id: i64) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let organisation_id = fetch(conn, id)?.organisation_id;
            conn.execute("DELETE FROM forms WHERE id = ?1", [id])?;
            Ok(organisation_id)
        })
    }
}
