use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A form owned by an organisation. `data` is a form schema document
/// (`{answers, vars, title, description}`) accepted by
/// [`crate::schema::validate_form_schema`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: i64,
    pub name: String,
    pub organisation_id: i64,
    pub data: Value,
    pub created_at: String,
    pub updated_at: String,
}

/// Empty schema a newly created form starts from, titled after the form.
pub fn default_form_data(title: &str) -> Value {
    json!({
        "answers": [],
        "vars": {},
        "title": title,
        "description": ""
    })
}

pub fn editor_url(form_id: i64) -> String {
    format!("/editor/{}/", form_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::validate_form_schema;

    #[test]
    fn default_form_is_valid_and_titled() {
        let data = default_form_data("Intake");
        assert_eq!(validate_form_schema(&data), Ok(()));
        assert_eq!(data["title"], "Intake");
    }
}
