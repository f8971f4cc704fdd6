use super::{ensure_organisation, Store, StoreError, NOW};
use formgen_common::model::template::CardTemplate;
use formgen_common::schema::validate_card_schema;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{json, Value};

const COLUMNS: &str =
    "id, name, organisation_id, template_data, global_vars, created_at, updated_at";

fn from_row(row: &Row) -> rusqlite::Result<CardTemplate> {
    Ok(CardTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        organisation_id: row.get(2)?,
        template_data: row.get(3)?,
        global_vars: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

pub(crate) fn fetch(conn: &Connection, id: i64) -> Result<CardTemplate, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM card_templates WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound("Template"))
}

fn insert(
    conn: &Connection,
    organisation_id: i64,
    name: &str,
    template_data: &Value,
    global_vars: &Value,
) -> Result<CardTemplate, StoreError> {
    conn.execute(
        "INSERT INTO card_templates (name, organisation_id, template_data, global_vars)
         VALUES (?1, ?2, ?3, ?4)",
        params![name, organisation_id, template_data, global_vars],
    )?;
    fetch(conn, conn.last_insert_rowid())
}

impl Store {
    /// Creates a template in an existing organisation. The document must be
    /// a valid component forest.
    pub fn create_template(
        &self,
        organisation_id: i64,
        name: &str,
        template_data: &Value,
        global_vars: &Value,
    ) -> Result<CardTemplate, StoreError> {
        validate_card_schema(template_data)?;
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            insert(conn, organisation_id, name, template_data, global_vars)
        })
    }

    /// Creates a template from a raw JSON document supplied by a user.
    ///
    /// The organisation is checked first, then the text is parsed
    /// (`StoreError::Parse`) and validated (`StoreError::Schema`). Imported
    /// templates start with empty global variables.
    pub fn import_template(
        &self,
        organisation_id: i64,
        name: &str,
        raw_json: &str,
    ) -> Result<CardTemplate, StoreError> {
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            let template_data: Value = serde_json::from_str(raw_json)?;
            validate_card_schema(&template_data)?;
            insert(conn, organisation_id, name, &template_data, &json!({}))
        })
    }

    pub fn template(&self, id: i64) -> Result<CardTemplate, StoreError> {
        self.with_conn(|conn| fetch(conn, id))
    }

    pub fn templates_for(&self, organisation_id: i64) -> Result<Vec<CardTemplate>, StoreError> {
        self.with_conn(|conn| {
            ensure_organisation(conn, organisation_id)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM card_templates WHERE organisation_id = ?1 ORDER BY id",
                COLUMNS
            ))?;
            let rows = stmt.query_map([organisation_id], from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }

    /// Replaces the whole component forest of a template.
    pub fn save_template_data(&self, id: i64, template_data: &Value) -> Result<(), StoreError> {
        self.with_conn(|conn| {
            fetch(conn, id)?;
            validate_card_schema(template_data)?;
            conn.execute(
                &format!(
                    "UPDATE card_templates SET template_data = ?1, updated_at = {} WHERE id = ?2",
                    NOW
                ),
                params![template_data, id],
            )?;
            Ok(())
        })
    }

    /// Deletes a template and the cards generated from it. Returns the id of
    /// the organisation that owned it.
    pub fn delete_template(&self, id: i64) -> Result<i64, StoreError> {
        self.with_conn(|conn| {
            let organisation_id = fetch(conn, id)?.organisation_id;
            conn.execute("DELETE FROM card_templates WHERE id = ?1", [id])?;
            Ok(organisation_id)
        })
    }
}
