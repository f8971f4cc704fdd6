use super::{SchemaViolation, ViolationReason, ROOT};
use serde_json::{Map, Value};

const SUB_FORM_FIELDS: [&str; 4] = ["id", "title", "type", "questions"];
const QUESTION_FIELDS: [&str; 3] = ["id", "title", "type"];

/// Validates a form schema: an object whose `answers` array holds sub-forms
/// of `type` "form", each with an array of questions.
///
/// Questions only need `id`, `title` and `type`; unlike component tags, the
/// question `type` is free text. Nothing below question level is checked.
pub fn validate_form_schema(doc: &Value) -> Result<(), SchemaViolation> {
    let fields = doc
        .as_object()
        .ok_or_else(|| SchemaViolation::at(ROOT, ViolationReason::NotAnObject))?;
    let answers = fields
        .get("answers")
        .ok_or_else(|| SchemaViolation::at(ROOT, ViolationReason::MissingField("answers")))?
        .as_array()
        .ok_or_else(|| SchemaViolation::at("$.answers", ViolationReason::NotAnArray))?;

    for (idx, sub_form) in answers.iter().enumerate() {
        check_sub_form(sub_form, &format!("$.answers[{}]", idx))?;
    }
    Ok(())
}

pub fn is_valid_form_schema(doc: &Value) -> bool {
    validate_form_schema(doc).is_ok()
}

fn check_sub_form(sub_form: &Value, path: &str) -> Result<(), SchemaViolation> {
    let fields = require_fields(sub_form, path, &SUB_FORM_FIELDS)?;

    let kind = &fields["type"];
    if kind.as_str() != Some("form") {
        return Err(SchemaViolation::at(
            &format!("{}.type", path),
            ViolationReason::NotAForm(kind.to_string()),
        ));
    }

    let questions_path = format!("{}.questions", path);
    let questions = fields["questions"]
        .as_array()
        .ok_or_else(|| SchemaViolation::at(&questions_path, ViolationReason::NotAnArray))?;
    for (idx, question) in questions.iter().enumerate() {
        require_fields(question, &format!("{}[{}]", questions_path, idx), &QUESTION_FIELDS)?;
    }
    Ok(())
}

fn require_fields<'a>(
    value: &'a Value,
    path: &str,
    required: &[&'static str],
) -> Result<&'a Map<String, Value>, SchemaViolation> {
    let fields = value
        .as_object()
        .ok_or_else(|| SchemaViolation::at(path, ViolationReason::NotAnObject))?;
    match required.iter().find(|name| !fields.contains_key(**name)) {
        Some(&missing) => Err(SchemaViolation::at(path, ViolationReason::MissingField(missing))),
        None => Ok(fields),
    }
}
