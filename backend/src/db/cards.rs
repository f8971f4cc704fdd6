use super::templates;
use super::{Store, StoreError};
use formgen_common::model::card::GeneratedCard;
use rusqlite::{params, Connection, OptionalExtension, Row};

const COLUMNS: &str = "id, template_id, name, card_data, global_vars, created_at, updated_at";

fn from_row(row: &Row) -> rusqlite::Result<GeneratedCard> {
    Ok(GeneratedCard {
        id: row.get(0)?,
        template_id: row.get(1)?,
        name: row.get(2)?,
        card_data: row.get(3)?,
        global_vars: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> Result<GeneratedCard, StoreError> {
    conn.query_row(
        &format!("SELECT {} FROM generated_cards WHERE id = ?1", COLUMNS),
        [id],
        from_row,
    )
    .optional()?
    .ok_or(StoreError::NotFound("Card"))
}

impl Store {
    /// Creates a card from the template's current component forest and
    /// global variables. The card keeps its own copy; later template saves do
    /// not reach it. The card data is not revalidated.
    pub fn generate_card(&self, template_id: i64, name: &str) -> Result<GeneratedCard, StoreError> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            let template = templates::fetch(&tx, template_id)?;
            tx.execute(
                "INSERT INTO generated_cards (template_id, name, card_data, global_vars)
                 VALUES (?1, ?2, ?3, ?4)",
                params![template.id, name, template.template_data, template.global_vars],
            )?;
            let card = fetch(&tx, tx.last_insert_rowid())?;
            tx.commit()?;
            Ok(card)
        })
    }

    pub fn card(&self, id: i64) -> Result<GeneratedCard, StoreError> {
        self.with_conn(|conn| fetch(conn, id))
    }

    pub fn cards_for(&self, template_id: i64) -> Result<Vec<GeneratedCard>, StoreError> {
        self.with_conn(|conn| {
            templates::fetch(conn, template_id)?;
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM generated_cards WHERE template_id = ?1 ORDER BY id",
                COLUMNS
            ))?;
            let rows = stmt.query_map([template_id], from_row)?;
            Ok(rows.collect::<Result<Vec<_>, _>>()?)
        })
    }
}
