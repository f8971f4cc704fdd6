use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A card produced from a template.
///
/// `card_data` and `global_vars` are copies taken when the card was generated;
/// `template_id` is only a historical reference and later edits to the
/// template never reach the card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCard {
    pub id: i64,
    pub template_id: i64,
    pub name: String,
    pub card_data: Value,
    pub global_vars: Value,
    pub created_at: String,
    pub updated_at: String,
}
