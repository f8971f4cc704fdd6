use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A card template: an ordered forest of components plus the global variables
/// the components may refer to.
///
/// `template_data` always holds a document accepted by
/// [`crate::schema::validate_card_schema`]; it is only ever replaced as a whole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    pub id: i64,
    pub name: String,
    pub organisation_id: i64,
    pub template_data: Value,
    pub global_vars: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Skeleton every newly created template starts from.
pub fn default_template_data() -> Value {
    json!([
        {
            "tag": "div",
            "class": "flex flex-col gap-4 p-4",
            "children": [
                {
                    "tag": "h2",
                    "class": "text-xl font-bold",
                    "value": "New Card Template"
                },
                {
                    "tag": "p",
                    "class": "text-gray-600",
                    "value": "Add your components here"
                }
            ]
        }
    ])
}

/// Editor URL a client is sent to after creating or importing a template.
pub fn editor_url(template_id: i64) -> String {
    format!("/cardgen/editor/{}/", template_id)
}
